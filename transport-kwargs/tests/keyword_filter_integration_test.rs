use std::fmt;
use std::sync::{Arc, Mutex};
use std::thread;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use transport_kwargs::{
    check_kwargs, inspect_kwargs, ArgSpec, Callable, Declared, Kwargs, LogTarget, Logger,
    OptionsSchema, Signature, TransportRegistry,
};

#[derive(Default)]
struct CollectingLogger {
    messages: Mutex<Vec<String>>,
}

impl CollectingLogger {
    fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

impl Logger for CollectingLogger {
    fn warn(&self, args: fmt::Arguments<'_>) {
        self.messages.lock().unwrap().push(args.to_string());
    }
}

fn kwargs(value: Value) -> Kwargs {
    serde_json::from_value(value).expect("test kwargs must be an object")
}

#[test]
fn test_legacy_argspec_and_signature_agree() {
    // def open(uri, mode="rb", buffering=-1, **kwargs)
    let legacy = ArgSpec {
        args: vec!["uri".into(), "mode".into(), "buffering".into()],
        varargs: None,
        varkw: Some("kwargs".into()),
        defaults: vec![json!("rb"), json!(-1)],
    };
    let modern = Signature::builder()
        .required("uri")
        .optional("mode", "rb")
        .optional("buffering", -1)
        .var_keyword("kwargs")
        .build()
        .unwrap();

    assert_eq!(inspect_kwargs(&legacy).unwrap(), inspect_kwargs(&modern).unwrap());
}

#[test]
fn test_uniform_params_across_backends() {
    let registry = TransportRegistry::with_defaults();
    let logger = CollectingLogger::default();
    let params = kwargs(json!({
        "buffer_size": 1024,
        "user": "alice",
        "min_part_size": 5_242_880
    }));

    let http = registry
        .transport_params("https://example.com/f", &params, &logger)
        .unwrap();
    let s3 = registry
        .transport_params("s3://bucket/f", &params, &logger)
        .unwrap();
    let hdfs = registry
        .transport_params("webhdfs://nn/f", &params, &logger)
        .unwrap();

    assert_eq!(http, kwargs(json!({"buffer_size": 1024, "user": "alice"})));
    assert_eq!(
        s3,
        kwargs(json!({"buffer_size": 1024, "min_part_size": 5_242_880}))
    );
    assert_eq!(hdfs, kwargs(json!({"min_part_size": 5_242_880})));
    assert_eq!(
        logger.messages(),
        vec![
            r#"ignoring unsupported keyword arguments: ['min_part_size']"#.to_string(),
            r#"ignoring unsupported keyword arguments: ['user']"#.to_string(),
            r#"ignoring unsupported keyword arguments: ['buffer_size', 'user']"#.to_string(),
        ]
    );
}

#[test]
fn test_custom_backend_registration() {
    #[derive(Debug, Default, Serialize, Deserialize)]
    struct SftpOptions {
        port: u16,
        connect_kwargs: Option<Kwargs>,
    }

    let mut registry = TransportRegistry::new();
    registry.register("sftp", OptionsSchema::<SftpOptions>::new());

    let logger = CollectingLogger::default();
    let filtered = registry
        .transport_params(
            "sftp://host/path",
            &kwargs(json!({"port": 2222, "kerberos": true})),
            &logger,
        )
        .unwrap();

    assert_eq!(filtered, kwargs(json!({"port": 2222})));
    assert_eq!(logger.messages().len(), 1);
}

#[test]
fn test_declared_backend_invoked_with_filtered_keywords() {
    let signature = Signature::builder()
        .required("uri")
        .keyword_only("compression", "infer_from_extension")
        .build()
        .unwrap();
    let backend = Declared::new(signature, |kw: &Kwargs| {
        kw.get("compression").cloned().unwrap_or(Value::Null)
    });

    let logger = CollectingLogger::default();
    let compression = backend
        .call_filtered(
            &kwargs(json!({"compression": ".gz", "uri": "ignored"})),
            &logger,
        )
        .unwrap();

    assert_eq!(compression, json!(".gz"));
    assert_eq!(
        logger.messages(),
        vec![r#"ignoring unsupported keyword arguments: ['uri']"#.to_string()]
    );
}

#[test]
fn test_shared_callable_across_threads() {
    let backend: Arc<dyn Callable> = Arc::new(
        Signature::builder()
            .optional("a", 1)
            .optional("b", 2)
            .build()
            .unwrap(),
    );
    let logger = Arc::new(CollectingLogger::default());

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let backend = Arc::clone(&backend);
            let logger = Arc::clone(&logger);
            thread::spawn(move || {
                check_kwargs(
                    backend.as_ref(),
                    &kwargs(json!({"a": i, "c": i})),
                    logger.as_ref(),
                )
                .unwrap()
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        assert_eq!(handle.join().unwrap(), kwargs(json!({"a": i})));
    }
    assert_eq!(logger.messages().len(), 4);
}

#[test_log::test]
fn test_log_target_logger() {
    let filtered = check_kwargs(
        &Signature::empty(),
        &kwargs(json!({"x": 1})),
        &LogTarget("keyword_filter_integration_test"),
    )
    .unwrap();

    assert!(filtered.is_empty());
}
