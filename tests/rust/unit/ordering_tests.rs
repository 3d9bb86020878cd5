//! Join clause ordering: connectivity and unresolvable input

#[cfg(test)]
mod ordering_tests {
    use joinplan::join_planner::{sort_foreign_keys, DatasetForeignKeyClause, ForeignKeyRef};

    fn clause(left: &str, right: &str) -> DatasetForeignKeyClause {
        DatasetForeignKeyClause::inner(
            ForeignKeyRef::new(format!("{}_ds", left), "fk", left),
            ForeignKeyRef::new(format!("{}_ds", right), "id", right),
        )
    }

    fn assert_each_clause_joins_scope(clauses: &[DatasetForeignKeyClause]) {
        for (i, current) in clauses.iter().enumerate().skip(1) {
            let anchor = &current.keys[0].alias;
            assert!(
                clauses[..i].iter().any(|earlier| earlier.references(anchor)),
                "clause {} anchored on {} which is not in scope",
                i,
                anchor
            );
        }
    }

    #[test]
    fn test_star_shaped_input_out_of_order() {
        // seed is "a"; "c = b" only connects once "b" is reached
        let clauses = vec![clause("a", "base"), clause("c", "b"), clause("d", "base"), clause("b", "a")];
        let ordered = sort_foreign_keys(clauses);

        assert!(ordered.is_complete());
        assert_eq!(ordered.clauses.len(), 4);
        assert_each_clause_joins_scope(&ordered.clauses);
    }

    #[test]
    fn test_long_chain_reversed() {
        let mut clauses: Vec<DatasetForeignKeyClause> =
            (0..10).map(|i| clause(&format!("n{}", i + 1), &format!("n{}", i))).collect();
        clauses.rotate_left(9);
        let ordered = sort_foreign_keys(clauses);

        assert!(ordered.is_complete());
        assert_each_clause_joins_scope(&ordered.clauses);
    }

    #[test]
    fn test_disconnected_clauses_are_reported() {
        let clauses = vec![clause("a", "b"), clause("x", "y"), clause("y", "z")];
        let ordered = sort_foreign_keys(clauses);

        assert!(!ordered.is_complete());
        assert_eq!(ordered.clauses.len(), 1);
        assert_eq!(ordered.unresolved.len(), 2);
    }

    #[test]
    fn test_empty_input() {
        let ordered = sort_foreign_keys(vec![]);
        assert!(ordered.clauses.is_empty());
        assert!(ordered.is_complete());
    }
}
