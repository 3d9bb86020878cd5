//! Alias encoding: known vectors and collision behaviour

#[cfg(test)]
mod alias_tests {
    use std::collections::HashSet;

    use joinplan::dataset_graph::JoinPath;
    use joinplan::join_planner::{encode_path, qualify_fid, BASE_DATASET_ALIAS};
    use test_case::test_case;

    #[test_case("orders", "customer_id", "customers", "id", "24ihmn0mjfg" ; "orders to customers")]
    #[test_case("customers", "id", "orders", "customer_id", "21rrdw2hcaz" ; "customers to orders")]
    #[test_case("customers", "region_id", "regions", "id", "vt0cxh9vt3" ; "customers to regions")]
    fn test_single_hop_vectors(from: &str, fid: &str, to: &str, tid: &str, expected: &str) {
        assert_eq!(encode_path(&[JoinPath::new(from, fid, to, tid)]), expected);
    }

    #[test]
    fn test_two_hop_vector() {
        let path = vec![
            JoinPath::new("orders", "customer_id", "customers", "id"),
            JoinPath::new("customers", "region_id", "regions", "id"),
        ];
        assert_eq!(encode_path(&path), "26rbvfzsb7f");
    }

    #[test]
    fn test_empty_path_is_base() {
        assert_eq!(encode_path(&[]), BASE_DATASET_ALIAS);
        assert_eq!(qualify_fid(&[], "amount"), "wvjl67o803.amount");
    }

    #[test]
    fn test_hop_order_matters() {
        let a = JoinPath::new("a", "x", "b", "y");
        let b = JoinPath::new("b", "z", "c", "w");
        assert_ne!(encode_path(&[a.clone(), b.clone()]), encode_path(&[b, a]));
    }

    #[test]
    fn test_no_collisions_across_generated_paths() {
        let mut seen = HashSet::new();
        for i in 0..100 {
            for j in 0..100 {
                let path = vec![
                    JoinPath::new(format!("ds{}", i), "fk", format!("ds{}", j), "id"),
                    JoinPath::new(format!("ds{}", j), format!("f{}", i), "tail", "id"),
                ];
                assert!(seen.insert(encode_path(&path)), "collision at ({}, {})", i, j);
            }
        }
        assert_eq!(seen.len(), 10_000);
    }
}
