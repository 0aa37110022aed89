//! Binding compiler tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use proftool_agent::compiler::{BindingCompiler, Lifecycle, Registration};
use proftool_agent::config;
use proftool_core::binding::{Action, BindingSet, Phase};
use proftool_core::{FeatureFlags, ProfError};

fn registration() -> Registration {
    Registration {
        helper: "proftool_agent::probe::Probe".into(),
        entity: "app.Main".into(),
        operation: "main".into(),
        action: "registerMBean".into(),
        object_name: "proftool:type=Statistics".into(),
    }
}

fn compile(flags: FeatureFlags, input: &str) -> BindingSet {
    BindingCompiler::new(flags, registration())
        .compile_str(input)
        .unwrap()
}

fn calls_only() -> FeatureFlags {
    FeatureFlags {
        call_counts: true,
        ..Default::default()
    }
}

/// (name, phase, action name) triples for compact assertions.
fn shape(set: &BindingSet) -> Vec<(String, Phase, String)> {
    set.bindings
        .iter()
        .map(|b| (b.target.to_string(), b.phase, b.action.name().to_string()))
        .collect()
}

#[test]
fn duplicate_lines_contribute_nothing() {
    let set = compile(calls_only(), "Foo#bar\nFoo#bar\nFoo#baz\n");
    assert_eq!(
        shape(&set),
        vec![
            ("app.Main#main".to_string(), Phase::Entry, "registerMBean".to_string()),
            ("Foo#bar".to_string(), Phase::Entry, "incrementMethodCallCount".to_string()),
            ("Foo#baz".to_string(), Phase::Entry, "incrementMethodCallCount".to_string()),
        ]
    );
    let orders: Vec<usize> = set.bindings.iter().map(|b| b.order).collect();
    assert_eq!(orders, vec![0, 1, 2]);
}

#[test]
fn feeding_a_line_twice_equals_feeding_it_once() {
    let flags = FeatureFlags::all();
    assert_eq!(compile(flags, "A#x\nA#x\n"), compile(flags, "A#x\n"));
    assert_eq!(
        compile(flags, "A#x\nB#y\nA#x\nB#y\n"),
        compile(flags, "A#x\nB#y\n")
    );
}

#[test]
fn registration_comes_first_and_carries_options() {
    let set = compile(FeatureFlags::all(), "A#x\n");
    let first = &set.bindings[0];
    assert_eq!(first.phase, Phase::Entry);
    assert_eq!(first.target.entity, "app.Main");
    match &first.action {
        Action::Register {
            object_name,
            options,
            ..
        } => {
            assert_eq!(object_name, "proftool:type=Statistics");
            assert!(options.lifetime_min && options.lifetime_max);
            assert!(options.exec_time_min && options.exec_time_max);
            assert!(options.exception_exits);
        }
        other => panic!("unexpected first action: {other:?}"),
    }
    assert_eq!(set.helper, "proftool_agent::probe::Probe");
}

#[test]
fn empty_input_yields_only_registration() {
    let set = compile(FeatureFlags::all(), "");
    assert_eq!(set.len(), 1);
}

#[test]
fn call_counts_alone_gives_one_entry_per_target() {
    let input = "A#x\nA#y\nB#x\nC#z\n";
    let set = compile(calls_only(), input);
    assert_eq!(set.len(), 1 + 4);
    assert_eq!(set.count_of(&Action::IncrementCallCount), 4);
    assert!(set.bindings[1..].iter().all(|b| b.phase == Phase::Entry));
}

#[test]
fn binding_counts_follow_flags() {
    // N = 5 targets across E = 3 entities.
    let input = "A#x\nA#y\nB#x\nB#y\nC#z\n";
    let (n, e) = (5, 3);

    let all = compile(FeatureFlags::all(), input);
    // per entity: instance count + creation + 2 lifetime; per target: call + 2 timing + exception
    assert_eq!(all.len(), 1 + 4 * e + 4 * n);

    let counts = compile(
        FeatureFlags {
            instance_counts: true,
            ..Default::default()
        },
        input,
    );
    // per entity: instance count + 2 live decrements
    assert_eq!(counts.len(), 1 + 3 * e);
    assert_eq!(counts.count_of(&Action::DecrementLiveInstanceCount), 2 * e);

    let exceptions = compile(
        FeatureFlags {
            exception_exits: true,
            ..Default::default()
        },
        input,
    );
    assert_eq!(exceptions.len(), 1 + n);

    let none = compile(FeatureFlags::default(), input);
    assert_eq!(none.len(), 1);
}

#[test]
fn lifetime_min_implies_average_tracking() {
    let set = compile(
        FeatureFlags {
            instance_lifetime_min: true,
            ..Default::default()
        },
        "A#x\n",
    );
    assert_eq!(set.count_of(&Action::RecordCreationTime), 1);
    assert_eq!(set.count_of(&Action::RecordInstanceLifetime), 2);
    assert_eq!(set.count_of(&Action::IncrementInstanceCount), 0);
    assert_eq!(set.count_of(&Action::DecrementLiveInstanceCount), 0);
}

#[test]
fn lifetime_and_live_decrement_are_exclusive() {
    let set = compile(
        FeatureFlags {
            instance_counts: true,
            instance_lifetime_avg: true,
            ..Default::default()
        },
        "A#x\n",
    );
    assert_eq!(set.count_of(&Action::RecordInstanceLifetime), 2);
    assert_eq!(set.count_of(&Action::DecrementLiveInstanceCount), 0);

    let lifetimes: Vec<_> = set
        .bindings
        .iter()
        .filter(|b| b.action == Action::RecordInstanceLifetime)
        .map(|b| (b.target.operation.as_str(), b.phase))
        .collect();
    assert_eq!(lifetimes, vec![("run", Phase::Exit), ("run", Phase::ExceptionExit)]);
}

#[test]
fn exec_time_max_implies_average_and_exception_exits() {
    let set = compile(
        FeatureFlags {
            exec_time_max: true,
            ..Default::default()
        },
        "A#x\n",
    );
    assert_eq!(
        shape(&set)[1..].to_vec(),
        vec![
            ("A#x".to_string(), Phase::Entry, "recordMethodCallTime".to_string()),
            ("A#x".to_string(), Phase::Exit, "recordMethodExecTime".to_string()),
            ("A#x".to_string(), Phase::ExceptionExit, "incrementMethodExitExceptCount".to_string()),
        ]
    );
}

#[test]
fn entity_bindings_precede_first_operation_and_are_not_repeated() {
    let flags = FeatureFlags {
        instance_counts: true,
        call_counts: true,
        ..Default::default()
    };
    let set = compile(flags, "A#x\nB#y\nA#z\n");
    assert_eq!(
        shape(&set),
        vec![
            ("app.Main#main".to_string(), Phase::Entry, "registerMBean".to_string()),
            ("A#<init>".to_string(), Phase::Exit, "incrementInstanceCount".to_string()),
            ("A#run".to_string(), Phase::Exit, "decrementLiveInstanceCount".to_string()),
            ("A#run".to_string(), Phase::ExceptionExit, "decrementLiveInstanceCount".to_string()),
            ("A#x".to_string(), Phase::Entry, "incrementMethodCallCount".to_string()),
            ("B#<init>".to_string(), Phase::Exit, "incrementInstanceCount".to_string()),
            ("B#run".to_string(), Phase::Exit, "decrementLiveInstanceCount".to_string()),
            ("B#run".to_string(), Phase::ExceptionExit, "decrementLiveInstanceCount".to_string()),
            ("B#y".to_string(), Phase::Entry, "incrementMethodCallCount".to_string()),
            ("A#z".to_string(), Phase::Entry, "incrementMethodCallCount".to_string()),
        ]
    );
}

#[test]
fn binding_names_are_unique() {
    let set = compile(FeatureFlags::all(), "A#x\nA#y\nB#x\n");
    let mut names: Vec<&str> = set.bindings.iter().map(|b| b.name.as_str()).collect();
    names.sort();
    names.dedup();
    assert_eq!(names.len(), set.len());
}

#[test]
fn malformed_line_reports_its_number() {
    let err = BindingCompiler::new(calls_only(), registration())
        .compile_str("A#x\n\nnot-a-target\nB#y\n")
        .expect_err("must fail");
    assert_eq!(err.code().as_str(), "INPUT_FORMAT");
    match err {
        ProfError::InputFormat { line, reason } => {
            assert_eq!(line, 3);
            assert!(reason.contains("not-a-target"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn blank_lines_and_crlf_are_tolerated() {
    let set = compile(calls_only(), "A#x\r\n\r\n  \nA#x\r\nA#y\r\n");
    assert_eq!(set.len(), 3);
    assert_eq!(set.bindings[2].target.operation, "y");
}

#[test]
fn lifecycle_operations_are_configurable() {
    let set = BindingCompiler::new(
        FeatureFlags {
            instance_lifetime_avg: true,
            ..Default::default()
        },
        registration(),
    )
    .with_lifecycle(Lifecycle {
        constructor: "new".into(),
        completion: "close".into(),
    })
    .compile_str("Conn#send\n")
    .unwrap();
    assert_eq!(set.bindings[1].target.operation, "new");
    assert_eq!(set.bindings[2].target.operation, "close");
}

#[test]
fn run_reads_targets_and_writes_json() {
    let dir = std::env::temp_dir().join(format!("proftool-compiler-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let input = dir.join("targets.txt");
    let output = dir.join("rules.json");
    std::fs::write(&input, "Foo#bar\nFoo#bar\nFoo#baz\n").unwrap();

    let yaml = format!(
        r#"
version: 1
compiler:
  input_file: "{}"
  output_file: "{}"
features:
  call_counts: true
"#,
        input.display(),
        output.display()
    );
    let cfg = config::load_from_str(&yaml).unwrap();
    let set = proftool_agent::compiler::run(&cfg).unwrap();
    assert_eq!(set.len(), 3);

    let written: BindingSet =
        serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(written, set);

    std::fs::remove_dir_all(&dir).unwrap();
}
