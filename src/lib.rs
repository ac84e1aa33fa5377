pub mod annotation;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod highlight;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod paths;
pub mod render;
pub mod scale;
pub mod selection;
pub mod store;
pub mod theme;
pub mod viewer;

pub use annotation::{AnnotationTable, strip_identifier};
#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, LayoutConfig, Padding, PathConfig, load_config};
pub use error::{AnnotationError, LoadError, ModuleIdError};
pub use highlight::{EdgeLookup, Highlight, clear_highlight, project};
pub use ir::{Link, Module, ModuleId, Node};
pub use layout::{Canvas, Layout, compute_layout};
pub use paths::{NodePath, find_paths_through_required};
pub use render::{Scene, render_svg};
pub use selection::SelectionModel;
pub use store::{DocumentSource, FileSource, InlineSource, load_module};
pub use theme::Theme;
pub use viewer::{ViewState, Viewer};
