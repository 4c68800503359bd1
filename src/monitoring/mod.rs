/*!
 * Monitoring
 * Structured logging and per-command tracing
 */

mod tracer;

pub use tracer::{generate_trace_id, init_tracing, span_command, CommandSpan};
