/*!
Command layer: everything between argv and the rendered payload.

  catalog.rs     (operation descriptor types + lookup index)
  operations.rs  (the Outline operation table, pure data)
  builder.rs     (clap command tree generated from the catalog)
  bind.rs        (raw flags -> typed RequestEnvelope)
  paginate.rs    (`--all` page driver)
  render.rs      (json / table output)
  format.rs      (terminal table / box primitives used by render.rs)
  dispatch.rs    (one invocation: config -> op -> bind -> call -> render)
*/

pub mod bind;
pub mod builder;
pub mod catalog;
pub mod dispatch;
pub mod format;
mod operations;
pub mod paginate;
pub mod render;

pub use bind::{OutputFormat, PageRequest, RawArgs, RequestEnvelope, bind};
pub use builder::{Invocation, build_command, parse, report_parse_error};
pub use catalog::{Catalog, Method, OperationDescriptor, ParamKind, ParamSpec, Paging};
pub use dispatch::Dispatcher;
pub use format::StyleOptions;
pub use paginate::Paginator;
