#[cfg(test)]
pub mod test {
    use std::any::Any;

    use crate::component::{BoxError, StorageFilter, StorageHandler};
    use crate::literal::Literal;
    use crate::params::{FILTER_BASE, HANDLER_BASE, ParamSpec};
    use crate::registry::Registry;

    /// Handler that records whatever it was constructed with.
    #[derive(Debug)]
    pub struct DummyHandler {
        pub base_url: Option<String>,
        pub path: Option<Literal>,
        pub filters: Vec<Box<dyn StorageFilter>>,
    }

    pub static DUMMY_PARAMS: ParamSpec = ParamSpec {
        names: &[],
        base: Some(&HANDLER_BASE),
    };

    impl StorageHandler for DummyHandler {
        fn validate(&self) -> Result<(), BoxError> {
            for filter in &self.filters {
                filter.validate()?;
            }
            Ok(())
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    /// Handler with required and optional parameters of its own.
    #[derive(Debug)]
    pub struct BucketHandler {
        pub bucket_name: String,
        pub region: Option<String>,
        pub shard_depth: Option<i64>,
        pub filters: Vec<Box<dyn StorageFilter>>,
    }

    pub static BUCKET_PARAMS: ParamSpec = ParamSpec {
        names: &["bucket_name", "region", "shard_depth"],
        base: Some(&HANDLER_BASE),
    };

    impl StorageHandler for BucketHandler {
        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    /// Filter with no parameters at all.
    #[derive(Debug)]
    pub struct RandomizeName;

    pub static RANDOMIZE_PARAMS: ParamSpec = ParamSpec {
        names: &[],
        base: Some(&FILTER_BASE),
    };

    impl StorageFilter for RandomizeName {
        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    /// Filter requiring a structured-literal argument.
    #[derive(Debug)]
    pub struct ValidateExt {
        pub extensions: Literal,
    }

    pub static VALIDATE_EXT_PARAMS: ParamSpec = ParamSpec {
        names: &["extensions"],
        base: Some(&FILTER_BASE),
    };

    impl StorageFilter for ValidateExt {
        fn validate(&self) -> Result<(), BoxError> {
            match self.extensions.string_items() {
                Some(items) if !items.is_empty() => Ok(()),
                _ => Err("extensions must be a non-empty list or set of strings".into()),
            }
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    /// A registry with every fixture component, plus `DummyHandler` under an
    /// extra `archive` namespace for qualified-reference tests.
    pub fn registry() -> Registry {
        let mut registry = Registry::new();

        registry.register_handler("DummyHandler", &DUMMY_PARAMS, |mut args| {
            Ok(Box::new(DummyHandler {
                base_url: args.take_str("base_url")?,
                path: args.take("path"),
                filters: args.take_filters(),
            }))
        });
        registry.register_handler_in("archive", "DummyHandler", &DUMMY_PARAMS, |mut args| {
            Ok(Box::new(DummyHandler {
                base_url: args.take_str("base_url")?,
                path: args.take("path"),
                filters: args.take_filters(),
            }))
        });

        registry.register_handler("BucketHandler", &BUCKET_PARAMS, |mut args| {
            Ok(Box::new(BucketHandler {
                bucket_name: args.require_str("bucket_name")?,
                region: args.take_str("region")?,
                shard_depth: args.take_int("shard_depth")?,
                filters: args.take_filters(),
            }))
        });

        registry.register_filter("RandomizeName", &RANDOMIZE_PARAMS, |_| {
            Ok(Box::new(RandomizeName))
        });

        registry.register_filter("ValidateExt", &VALIDATE_EXT_PARAMS, |mut args| {
            let extensions = args
                .take("extensions")
                .ok_or("missing required argument 'extensions'")?;
            Ok(Box::new(ValidateExt { extensions }))
        });

        registry
    }
}
