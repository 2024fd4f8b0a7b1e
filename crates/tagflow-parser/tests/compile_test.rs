//! End-to-end tests of `tagflow_parser::compile` through the public API.

use tagflow_core::{
    layout::ObjectKind,
    semantic::{EventKind, TargetSlot},
};
use tagflow_parser::{
    CompileConfig, Location, Symbol, TokenOverflow, compile,
    error::{ErrorCode, ErrorKind},
};

const DEMO: &str = "<process name='Demo'><subprocess id='s1'><events><starter id='a' points='b'/><task id='b' name='Do X'/></events></subprocess></process>";

#[test]
fn test_demo_document() {
    let compilation = compile(DEMO, CompileConfig::default()).expect("demo should compile");
    let symbols = compilation.symbols();

    let starter = symbols.get("s1.a").and_then(Symbol::as_event).unwrap();
    assert_eq!(starter.kind(), EventKind::Starter);
    let task = symbols.get("s1.b").and_then(Symbol::as_event).unwrap();
    assert_eq!(task.kind(), EventKind::Task);
    assert_eq!(task.title(), "Do X");

    let from = symbols.get("s1.a").unwrap().object_id().unwrap();
    let to = symbols.get("s1.b").unwrap().object_id().unwrap();

    let diagram = compilation.diagram();
    assert_eq!(diagram.title(), "Demo");
    assert_eq!(diagram.edges().len(), 1);
    let edge = diagram.edges()[0];
    assert_eq!((edge.from(), edge.to(), edge.slot()), (from, to, TargetSlot::Mid));
    assert!(diagram.unresolved().is_empty());
    assert!(compilation.warnings().is_empty());
}

#[test]
fn test_forward_reference_across_subprocesses() {
    let source = "
        <process name='Orders'>
          <subprocess id='sales' name='Sales'>
            <events>
              <starter id='start' points='billing.invoice'/>
            </events>
          </subprocess>
          <subprocess id='billing'>
            <events>
              <task id='invoice' name='Send invoice' points='done'/>
              <end id='done'/>
            </events>
          </subprocess>
        </process>";
    let compilation = compile(source, CompileConfig::default()).unwrap();
    let diagram = compilation.diagram();

    let start = diagram.find("sales.start").unwrap();
    let invoice = diagram.find("billing.invoice").unwrap();
    let done = diagram.find("billing.done").unwrap();

    let pairs: Vec<_> = diagram.edges().iter().map(|e| (e.from(), e.to())).collect();
    assert_eq!(pairs, vec![(start, invoice), (invoice, done)]);
}

#[test]
fn test_dangling_reference_compiles_without_edge() {
    let source = "<process name='P'><subprocess id='s'><events>\
        <task id='a' points='nowhere'/>\
        </events></subprocess></process>";
    let compilation = compile(source, CompileConfig::default()).unwrap();
    let diagram = compilation.diagram();

    assert!(diagram.edges().is_empty());
    assert_eq!(diagram.unresolved().len(), 1);
    assert_eq!(diagram.unresolved()[0].target(), "s.nowhere");
}

#[test]
fn test_gateway_edges_per_slot() {
    let source = "<process name='P'><subprocess id='s'><events>\
        <gateway id='g' points='a,b' down='c'/>\
        <col><task id='a' row='up'/><task id='b'/><task id='c' row='down'/></col>\
        </events></subprocess></process>";
    let compilation = compile(source, CompileConfig::default()).unwrap();
    let diagram = compilation.diagram();
    let gateway = diagram.find("s.g").unwrap();

    let slots: Vec<_> = diagram.edges_from(gateway).map(|e| e.slot()).collect();
    assert_eq!(slots, vec![TargetSlot::Up, TargetSlot::Mid, TargetSlot::Down]);
}

#[test]
fn test_column_overflow_creates_no_fourth_object() {
    let source = "<process name='P'><subprocess id='s'><events><col>\
        <task id='a'/><task id='b'/><task id='c'/><task id='d'/>\
        </col></events></subprocess></process>";
    let err = compile(source, CompileConfig::default()).unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::E204));
    assert_eq!(err.kind(), Some(ErrorKind::Semantic));
}

#[test]
fn test_malformed_header_points_at_eof() {
    let err = compile("<process name='X'", CompileConfig::default()).unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::Syntax));
    assert_eq!(err.location(), Location::new(1, 18));
    assert_eq!(
        err.report_line("x.tflow"),
        "x.tflow:1:18: error: unexpected end of file, expected `>`"
    );
}

#[test]
fn test_object_order_and_kinds() {
    let compilation = compile(DEMO, CompileConfig::default()).unwrap();
    let kinds: Vec<_> = compilation
        .diagram()
        .objects()
        .iter()
        .map(|object| object.kind())
        .collect();
    assert_eq!(
        kinds,
        vec![
            ObjectKind::Subprocess,
            ObjectKind::Event(EventKind::Starter),
            ObjectKind::Event(EventKind::Task),
        ]
    );
}

#[test]
fn test_overflow_policy_reject() {
    let long_name = "x".repeat(300);
    let source = format!(
        "<process name='{long_name}'></process>"
    );

    let compilation = compile(&source, CompileConfig::default()).unwrap();
    assert_eq!(compilation.diagram().title().len(), 255);
    assert_eq!(compilation.warnings().len(), 1);

    let config = CompileConfig::default().with_token_overflow(TokenOverflow::Reject);
    let err = compile(&source, config).unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::E003));
    assert_eq!(err.kind(), Some(ErrorKind::Lex));
}

#[test]
fn test_symbol_capacity_is_a_typed_error() {
    let events: String = (0..20).map(|i| format!("<task id='t{i}'/>")).collect();
    let source = format!(
        "<process name='P'><subprocess id='s'><events>{events}</events></subprocess></process>"
    );
    let config = CompileConfig::default().with_symbol_capacity(16);
    let err = compile(&source, config).unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::E300));

    let config = CompileConfig::default().with_symbol_capacity(32);
    assert!(compile(&source, config).is_ok());
}
