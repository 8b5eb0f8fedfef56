//! Text transformation pipelines for the textpipe editor
//!
//!     A pipeline is a named, ordered list of steps. Each step names an operation from a closed
//!     catalog (trim, replace, change-case, sort-lines, ...) together with a free-form config
//!     object and an enabled flag. Applying a pipeline folds the enabled steps over the input
//!     text, left to right, whole string in and whole string out.
//!
//!     This is a pure lib: no code here assumes a shell, a terminal or a browser. The editor
//!     surface (selection tracking, preview pane) and the storage of saved pipelines belong to
//!     the host, see the textpipe-cli crate for a minimal host.
//!
//! Architecture
//!
//!     - OperationId / OperationDefinition: the closed catalog of operations and their metadata
//!     - OperationRegistry: static lookup of definitions (display metadata + default config)
//!     - TextOperation: one implementation per operation, each with its own typed config
//!     - ExecutorRegistry: strategy map from OperationId to a type-erased executor
//!     - PipelineExecutor: the reducer, folds enabled steps over the text
//!     - TransformationPipeline: the model plus pure CRUD and validation
//!     - interchange: versioned export envelope and the strict import validator
//!
//!     The file structure :
//!     .
//!     ├── error.rs                # ValidationError, InterchangeError
//!     ├── operation.rs            # OperationId, Category, OperationDefinition
//!     ├── registry.rs             # OperationRegistry (the catalog)
//!     ├── settings.rs             # EngineSettings
//!     ├── operations
//!     │   ├── mod.rs              # TextOperation, Executor, ExecutorRegistry
//!     │   ├── config.rs           # typed configs, lenient field parsing, StepConfig
//!     │   ├── case.rs             # word splitting and case conventions
//!     │   ├── text.rs             # whole-text operations
//!     │   ├── lines.rs            # line list operations
//!     │   ├── structure.rs        # layout operations
//!     │   ├── search.rs           # pattern driven operations
//!     │   └── data.rs             # encodings and numbers
//!     ├── pipeline
//!     │   ├── mod.rs              # TransformationPipeline, PipelineStep, CRUD
//!     │   ├── validation.rs       # PipelineAction and user facing checks
//!     │   └── executor.rs         # PipelineExecutor
//!     ├── interchange.rs          # ToolbarExport, import / export
//!     └── lib.rs
//!
//! Failure model
//!
//!     Execution is defensive: a bad regex, a non numeric width or an unknown mode never
//!     fails a pipeline, the affected step degrades to a pass-through. Import is strict: any
//!     structural problem rejects the whole file with a single coarse error.

pub mod error;
pub mod interchange;
pub mod operation;
pub mod operations;
pub mod pipeline;
pub mod registry;
pub mod settings;

pub use error::{InterchangeError, ValidationError};
pub use interchange::{export_json, import_json, ToolbarExport, CURRENT_VERSION};
pub use operation::{Category, OperationDefinition, OperationId};
pub use operations::config::{ConfigMap, StepConfig};
pub use operations::{ExecutionContext, Executor, ExecutorRegistry, TextOperation};
pub use pipeline::executor::{apply_pipeline, PipelineExecutor};
pub use pipeline::validation::PipelineAction;
pub use pipeline::{PipelineBuilder, PipelineStep, TransformationPipeline, DEFAULT_PIPELINE_ICON};
pub use registry::OperationRegistry;
pub use settings::EngineSettings;
