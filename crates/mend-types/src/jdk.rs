//! The bundled JDK subset.
//!
//! The stubs are ordinary Java sources declaring signatures only. They are parsed and
//! lowered once per process.

use std::sync::OnceLock;

use crate::env::{Origin, TypeStore};
use crate::lower::add_units;

const STUBS: &[(&str, &str)] = &[
    ("java.lang", include_str!("../stubs/java.lang.java")),
    ("java.lang.annotation", include_str!("../stubs/java.lang.annotation.java")),
    ("java.lang.reflect", include_str!("../stubs/java.lang.reflect.java")),
    ("java.util", include_str!("../stubs/java.util.java")),
    ("java.util.function", include_str!("../stubs/java.util.function.java")),
    ("java.util.stream", include_str!("../stubs/java.util.stream.java")),
    ("java.util.concurrent", include_str!("../stubs/java.util.concurrent.java")),
    ("java.io", include_str!("../stubs/java.io.java")),
    ("java.text", include_str!("../stubs/java.text.java")),
    ("java.net", include_str!("../stubs/java.net.java")),
    ("java.math", include_str!("../stubs/java.math.java")),
    ("java.sql", include_str!("../stubs/java.sql.java")),
    ("java.nio.file", include_str!("../stubs/java.nio.file.java")),
    ("java.security", include_str!("../stubs/java.security.java")),
];

static JDK: OnceLock<TypeStore> = OnceLock::new();

/// The lowered JDK stubs.
pub fn jdk() -> &'static TypeStore {
    JDK.get_or_init(|| {
        let parses: Vec<_> = STUBS
            .iter()
            .map(|(package, text)| {
                tracing::trace!(target: "mend.types", package, "lowering jdk stubs");
                mend_syntax::parse(text)
            })
            .collect();
        let units: Vec<_> = parses
            .iter()
            .map(|parse| (Origin::Jdk, parse.compilation_unit()))
            .collect();
        let mut store = TypeStore::new();
        add_units(&mut store, &units);
        tracing::debug!(target: "mend.types", classes = store.len(), "jdk stubs loaded");
        store
    })
}

impl TypeStore {
    /// A store pre-populated with the JDK stubs.
    pub fn with_jdk() -> TypeStore {
        jdk().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{ClassKind, TypeEnv};
    use crate::ty::Type;

    #[test]
    fn stubs_cover_common_types() {
        let jdk = jdk();
        for name in [
            "java.lang.Object",
            "java.lang.String",
            "java.util.Vector",
            "java.util.Map.Entry",
            "java.io.IOException",
            "java.text.ParseException",
            "java.net.SocketException",
        ] {
            assert!(jdk.class(name).is_some(), "missing {name}");
        }
    }

    #[test]
    fn supertypes_are_resolved_across_packages() {
        let jdk = jdk();
        let socket = jdk.class("java.net.SocketException").expect("class");
        assert_eq!(
            socket.super_class,
            Some(Type::class("java.io.IOException", Vec::new()))
        );
        let list = jdk.class("java.util.List").expect("class");
        assert_eq!(list.kind, ClassKind::Interface);
        assert_eq!(
            list.interfaces,
            vec![Type::class(
                "java.util.Collection",
                vec![Type::TypeVar("E".into())]
            )]
        );
    }

    #[test]
    fn object_has_no_super_class() {
        assert_eq!(jdk().class("java.lang.Object").expect("class").super_class, None);
    }
}
