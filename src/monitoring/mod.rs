/*!
 * Monitoring
 * Structured tracing for the kernel host loop
 */

mod tracer;

pub use tracer::{init_tracing, span_command, CommandSpan};
