// tests/property_names.rs

use proptest::prelude::*;

use drake::task::{is_normal_task, normalize_path, normalize_task_name, TaskKind};

fn segment() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z0-9_]{1,6}",
        Just(".".to_string()),
        Just("..".to_string()),
        Just(String::new()),
    ]
}

fn path() -> impl Strategy<Value = String> {
    (any::<bool>(), proptest::collection::vec(segment(), 1..6)).prop_map(|(absolute, segs)| {
        let joined = segs.join("/");
        if absolute { format!("/{joined}") } else { joined }
    })
}

proptest! {
    #[test]
    fn normalize_path_is_idempotent(p in path()) {
        let once = normalize_path(&p);
        prop_assert_eq!(normalize_path(&once), once.clone());
    }

    #[test]
    fn normalized_paths_have_no_dot_segments(p in path()) {
        let normalized = normalize_path(&p);
        if normalized != "." && normalized != "/" {
            let body = normalized.strip_prefix("./").unwrap_or(&normalized);
            prop_assert!(!body.split('/').skip(1).any(|s| s == "." || s.is_empty()));
        }
    }

    #[test]
    fn identifiers_are_normal_tasks(name in "[A-Za-z0-9_][A-Za-z0-9_-]{0,12}") {
        prop_assert!(is_normal_task(&name));
        prop_assert_eq!(TaskKind::classify(&name).unwrap(), TaskKind::Normal);
        prop_assert_eq!(normalize_task_name(&format!("  {name} ")).unwrap(), name);
    }

    #[test]
    fn paths_with_separators_are_file_tasks(dir in "[a-z]{1,5}", file in "[a-z]{1,5}\\.[a-z]{1,3}") {
        let name = format!("{dir}/{file}");
        prop_assert_eq!(TaskKind::classify(&name).unwrap(), TaskKind::File);
        prop_assert_eq!(normalize_task_name(&format!("./{name}")).unwrap(), name);
    }
}
