use nxschema_fs::NormalizedPath;
use proptest::prelude::*;

proptest! {
    #[test]
    fn test_normalization_invariants(s in "[a-z./\\\\]{0,24}") {
        let path = NormalizedPath::new(&s);
        let as_str = path.as_str();

        prop_assert!(!as_str.contains('\\'));
        prop_assert!(!as_str.contains("//"));
        prop_assert!(as_str == "." || !as_str.split('/').any(|seg| seg == "."), "{}", as_str);

        // Cleaning is idempotent
        let again = NormalizedPath::new(path.to_native());
        prop_assert_eq!(path, again);
    }

    #[test]
    fn test_join_then_relative_to_recovers_segment(
        base in "/[a-z]{1,6}(/[a-z]{1,6}){0,3}",
        seg in "[a-z]{1,6}(/[a-z]{1,6}){0,3}",
    ) {
        let base = NormalizedPath::new(&base);
        let joined = base.join(&seg);
        prop_assert!(joined.starts_with(&base));
        prop_assert_eq!(joined.relative_to(&base).unwrap(), NormalizedPath::new(&seg));
    }
}
