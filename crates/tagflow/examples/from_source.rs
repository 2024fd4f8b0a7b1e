//! Example: Compiling a process document and walking its flow
//!
//! This example compiles a small two-lane process, prints every positioned
//! object and then follows the edges leaving the starter.

use tagflow::{Compiler, ProcessGraph, config::AppConfig, layout::ObjectKind};

const SOURCE: &str = "
<process name='Order handling'>
  <subprocess id='sales' name='Sales'>
    <events>
      <starter id='order' points='check'/>
      <gateway id='check' up='reject' down='billing.invoice'/>
      <end id='reject'/>
    </events>
  </subprocess>
  <subprocess id='billing' name='Billing'>
    <events>
      <task id='invoice' name='Send invoice' points='paid'/>
      <wait id='paid' points='done'/>
      <end id='done'/>
    </events>
  </subprocess>
</process>";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let compiler = Compiler::new(AppConfig::default());
    let compilation = compiler.compile(SOURCE)?;
    let diagram = compilation.diagram();

    println!(
        "{} ({} columns x {} rows)\n",
        diagram.title(),
        diagram.grid().columns(),
        diagram.grid().rows()
    );

    for (id, object) in diagram.iter() {
        let kind = match object.kind() {
            ObjectKind::Event(kind) => kind.as_str(),
            ObjectKind::Subprocess => "subprocess",
        };
        let rect = object.rect();
        println!(
            "{id} {kind:<10} {:<16} at ({}, {}) size {}x{}",
            object.symbol(),
            rect.col(),
            rect.row(),
            rect.width(),
            rect.height()
        );
    }

    let graph = ProcessGraph::new(diagram);
    let Some(start) = diagram.find("sales.order") else {
        return Ok(());
    };

    println!("\nFlow from {start}:");
    let mut frontier = vec![start];
    while let Some(current) = frontier.pop() {
        for (next, slot) in graph.successors(current) {
            println!("  {current} -[{slot}]-> {next}");
            frontier.push(next);
        }
    }

    Ok(())
}
