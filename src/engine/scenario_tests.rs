#[cfg(test)]
mod scenario_tests {
    use std::any::Any;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::{Arc, Mutex, Weak};

    use crate::engine::{execute, DepRef, Input, NodeId, Receiver, Registry, Target, Value};
    use crate::errors::{ExecutionError, ResolveError};

    // Scenario A — linear chain with input.
    #[test]
    fn scenario_a_linear_chain_with_input() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let mut registry = Registry::new();

        let dep_a = registry.register_default(
            |args: &[Value]| {
                let build = args[0].downcast_ref::<String>().unwrap();
                Ok(Value::new(format!("{build}-build")))
            },
            vec![DepRef::Input("build")],
        );

        let dep_b_order = order.clone();
        let dep_b = registry
            .register(
                move |_args: &[Value]| {
                    dep_b_order.lock().unwrap().push("dep_b");
                    Ok(Value::new("dep_b".to_string()))
                },
                vec![],
                &[("priority", 2)],
            )
            .unwrap();

        let do_b_order = order.clone();
        let do_b = registry.register_default(
            move |args: &[Value]| {
                do_b_order.lock().unwrap().push("do_b");
                let result_a = args[0].downcast_ref::<String>().unwrap();
                let result_b = args[1].downcast_ref::<String>().unwrap();
                assert_eq!(result_a, "pdfium-build");
                assert_eq!(result_b, "dep_b");
                Ok(Value::new(format!("YESSS {result_a} {result_b}")))
            },
            vec![DepRef::Node(dep_a), DepRef::Node(dep_b)],
        );

        let do_c = registry.register_default(
            |args: &[Value]| {
                let result = args[0].downcast_ref::<String>().unwrap();
                assert_eq!(result, "YESSS pdfium-build dep_b");
                Ok(Value::new("YOYO".to_string()))
            },
            vec![DepRef::Node(do_b)],
        );

        let inputs = vec![Input::named("build").value("pdfium".to_string())];
        let result = execute(&registry, do_c, &inputs).unwrap();
        assert_eq!(result.downcast_ref::<String>().unwrap(), "YOYO");

        // dep_b (priority 2) is ready immediately, same as dep_a (default 100);
        // dep_b must run first.
        let recorded = order.lock().unwrap();
        assert_eq!(recorded.as_slice(), &["dep_b", "do_b"]);
    }

    /// A receiver that resolves its own `"internal_dep"` and `"test"`
    /// methods, binding both back to itself. Built with `Arc::new_cyclic`
    /// so `method` can hand back a shared handle to `self` without
    /// needing `self: Arc<Self>`.
    struct TestReceiver {
        self_ref: Weak<TestReceiver>,
        internal_dep: NodeId,
        test: NodeId,
    }

    impl TestReceiver {
        fn new(internal_dep: NodeId, test: NodeId) -> Arc<Self> {
            Arc::new_cyclic(|self_ref| TestReceiver { self_ref: self_ref.clone(), internal_dep, test })
        }
    }

    impl Receiver for TestReceiver {
        fn as_any(&self) -> &dyn Any {
            self
        }

        fn to_value(self: Arc<Self>) -> Value {
            Value::from_arc(self)
        }

        fn method(&self, name: &str) -> Option<(NodeId, Arc<dyn Receiver>)> {
            let me: Arc<dyn Receiver> = self.self_ref.upgrade()?;
            match name {
                "internal_dep" => Some((self.internal_dep, me)),
                "test" => Some((self.test, me)),
                _ => None,
            }
        }
    }

    /// A receiver holding another receiver as attribute `test_instance`.
    struct AnotherReceiver {
        test_instance: Arc<TestReceiver>,
    }

    impl Receiver for AnotherReceiver {
        fn as_any(&self) -> &dyn Any {
            self
        }

        fn to_value(self: Arc<Self>) -> Value {
            Value::from_arc(self)
        }

        fn child(&self, name: &str) -> Option<Arc<dyn Receiver>> {
            match name {
                "test_instance" => Some(self.test_instance.clone() as Arc<dyn Receiver>),
                _ => None,
            }
        }
    }

    #[test]
    fn scenario_b_method_binding_via_symbolic_reference() {
        let mut registry = Registry::new();

        let dep_a = registry.register_default(
            |args: &[Value]| Ok(Value::new(format!("{}-build", args[0].downcast_ref::<String>().unwrap()))),
            vec![DepRef::Input("build")],
        );
        let dep_b = registry.register(|_| Ok(Value::new("dep_b".to_string())), vec![], &[("priority", 2)]).unwrap();
        let do_b = registry.register_default(
            |args: &[Value]| {
                Ok(Value::new(format!(
                    "YESSS {} {}",
                    args[0].downcast_ref::<String>().unwrap(),
                    args[1].downcast_ref::<String>().unwrap()
                )))
            },
            vec![DepRef::Node(dep_a), DepRef::Node(dep_b)],
        );
        let do_c = registry.register_default(
            |args: &[Value]| Ok(Value::new(format!("YOYO {}", args[0].downcast_ref::<String>().unwrap()))),
            vec![DepRef::Node(do_b)],
        );

        let internal_calls = Arc::new(AtomicU32::new(0));
        let internal_calls_body = internal_calls.clone();
        let internal_dep = registry.register_default(
            move |_args: &[Value]| {
                internal_calls_body.fetch_add(1, Ordering::SeqCst);
                Ok(Value::new("internal".to_string()))
            },
            vec![],
        );

        let test = registry.register_default(
            |args: &[Value]| {
                let result_c = args[1].downcast_ref::<String>().unwrap();
                let result_b = args[2].downcast_ref::<String>().unwrap();
                let result_internal = args[3].downcast_ref::<String>().unwrap();
                assert_eq!(result_internal, "internal");
                Ok(Value::new(format!("From Test.test {result_c} {result_b}")))
            },
            vec![DepRef::Node(do_c), DepRef::Node(do_b), DepRef::Symbolic("internal_dep")],
        );

        let t = TestReceiver::new(internal_dep, test);
        let another_test = registry.register_default(
            |args: &[Value]| Ok(Value::new(format!("another {}", args[1].downcast_ref::<String>().unwrap()))),
            vec![DepRef::Symbolic("test_instance.test")],
        );
        let a: Arc<dyn Receiver> = Arc::new(AnotherReceiver { test_instance: t });

        let inputs = vec![Input::named("build").value("pdfium".to_string())];
        execute(&registry, Target::Bound(another_test, a), &inputs).unwrap();

        assert_eq!(internal_calls.load(Ordering::SeqCst), 1, "internal_dep must run exactly once");
    }

    // Scenario C — shared descriptor through one receiver.
    #[test]
    fn scenario_c_shared_descriptor_runs_once() {
        let calls = Arc::new(AtomicU32::new(0));
        let mut registry = Registry::new();

        let calls_body = calls.clone();
        let do_b = registry.register_default(
            move |_args: &[Value]| {
                calls_body.fetch_add(1, Ordering::SeqCst);
                Ok(Value::new("shared".to_string()))
            },
            vec![],
        );

        let do_c = registry.register_default(
            |args: &[Value]| Ok(Value::new(format!("c:{}", args[0].downcast_ref::<String>().unwrap()))),
            vec![DepRef::Node(do_b)],
        );

        let root = registry.register_default(
            |args: &[Value]| {
                Ok(Value::new(format!(
                    "{}/{}",
                    args[0].downcast_ref::<String>().unwrap(),
                    args[1].downcast_ref::<String>().unwrap()
                )))
            },
            vec![DepRef::Node(do_c), DepRef::Node(do_b)],
        );

        execute(&registry, root, &[]).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    // Scenario D — missing input.
    #[test]
    fn scenario_d_missing_input_fails_resolution_with_no_body_run() {
        let ran = Arc::new(AtomicU32::new(0));
        let mut registry = Registry::new();

        let ran_body = ran.clone();
        let dep_a = registry.register_default(
            move |_args: &[Value]| {
                ran_body.fetch_add(1, Ordering::SeqCst);
                Ok(Value::new(()))
            },
            vec![DepRef::Input("build")],
        );

        let err = execute(&registry, dep_a, &[]).unwrap_err();
        assert!(matches!(err, ExecutionError::Resolve(ResolveError::MissingInput(name)) if name == "build"));
        assert_eq!(ran.load(Ordering::SeqCst), 0);
    }

    // Scenario E — priority gated by dependency.
    #[test]
    fn scenario_e_priority_gated_by_dependency() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let mut registry = Registry::new();

        let high_order = order.clone();
        let slow_dep = registry.register_default(
            move |_args: &[Value]| {
                high_order.lock().unwrap().push("slow_dep");
                Ok(Value::new(()))
            },
            vec![],
        );

        let low_order = order.clone();
        let gated = registry
            .register(
                move |_args: &[Value]| {
                    low_order.lock().unwrap().push("gated");
                    Ok(Value::new(()))
                },
                vec![DepRef::Node(slow_dep)],
                &[("priority", 0)],
            )
            .unwrap();

        execute(&registry, gated, &[]).unwrap();
        assert_eq!(order.lock().unwrap().as_slice(), &["slow_dep", "gated"]);
    }

    // Scenario F — unresolvable symbolic reference.
    #[test]
    fn scenario_f_unresolvable_symbolic_reference_fails() {
        struct Empty;
        impl Receiver for Empty {
            fn as_any(&self) -> &dyn Any {
                self
            }
            fn to_value(self: Arc<Self>) -> Value {
                Value::from_arc(self)
            }
        }

        let mut registry = Registry::new();
        let target = registry.register_default(
            |_args: &[Value]| Ok(Value::new(())),
            vec![DepRef::Symbolic("not_a_real_attr.test")],
        );

        let receiver: Arc<dyn Receiver> = Arc::new(Empty);
        let err = execute(&registry, Target::Bound(target, receiver), &[]).unwrap_err();
        assert!(matches!(
            err,
            ExecutionError::Resolve(ResolveError::UnresolvableReference(path)) if path == "not_a_real_attr.test"
        ));
    }

    // Invariant 5 — same descriptor through two distinct receivers runs
    // twice; through the same receiver (or none) runs once.
    #[test]
    fn invariant_distinct_receivers_run_independently() {
        struct Carrier {
            self_ref: Weak<Carrier>,
            tag: &'static str,
            shared: NodeId,
        }

        impl Receiver for Carrier {
            fn as_any(&self) -> &dyn Any {
                self
            }
            fn to_value(self: Arc<Self>) -> Value {
                Value::new(self.tag)
            }
            fn method(&self, name: &str) -> Option<(NodeId, Arc<dyn Receiver>)> {
                let me: Arc<dyn Receiver> = self.self_ref.upgrade()?;
                (name == "shared").then_some((self.shared, me))
            }
        }

        let calls = Arc::new(AtomicU32::new(0));
        let mut registry = Registry::new();
        let calls_body = calls.clone();
        let shared = registry.register_default(
            move |args: &[Value]| {
                calls_body.fetch_add(1, Ordering::SeqCst);
                Ok(Value::new(*args[0].downcast_ref::<&'static str>().unwrap()))
            },
            vec![],
        );

        let one = Arc::new_cyclic(|self_ref| Carrier { self_ref: self_ref.clone(), tag: "one", shared });
        let two = Arc::new_cyclic(|self_ref| Carrier { self_ref: self_ref.clone(), tag: "two", shared });

        let runner = registry.register_default(
            |args: &[Value]| Ok(args[1].clone()),
            vec![DepRef::Symbolic("shared")],
        );

        execute(&registry, Target::Bound(runner, one), &[]).unwrap();
        execute(&registry, Target::Bound(runner, two), &[]).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    // Boundary case — an input marker supplied but unused is silently
    // ignored.
    #[test]
    fn unused_input_is_silently_ignored() {
        let mut registry = Registry::new();
        let root = registry.register_default(|_args: &[Value]| Ok(Value::new(7i32)), vec![]);

        let inputs = vec![Input::named("unused").value("whatever".to_string())];
        let result = execute(&registry, root, &inputs).unwrap();
        assert_eq!(*result.downcast_ref::<i32>().unwrap(), 7);
    }

    // Round-trip law — two identical executions agree.
    #[test]
    fn execute_is_pure_across_repeated_calls() {
        let mut registry = Registry::new();
        let dep = registry.register_default(
            |args: &[Value]| Ok(Value::new(format!("{}!", args[0].downcast_ref::<String>().unwrap()))),
            vec![DepRef::Input("name")],
        );

        let inputs = vec![Input::named("name").value("pdfium".to_string())];
        let first = execute(&registry, dep, &inputs).unwrap();
        let second = execute(&registry, dep, &inputs).unwrap();
        assert_eq!(first.downcast_ref::<String>(), second.downcast_ref::<String>());
    }
}
