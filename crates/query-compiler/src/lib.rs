pub mod analysis;
pub mod argument;
pub mod branch;
pub mod builder;
pub mod context;
pub mod error;
pub mod functions;
pub mod query;
pub mod settings;

pub use analysis::{AnalyzerCache, TextAnalyzer, token::Token};
pub use argument::{Argument, ArgumentRole, ParamKind, ValueSource};
pub use branch::{BranchBuilders, BuildContext, RangeArgs};
pub use builder::{QueryCompiler, TreeBuilder, compile};
pub use context::{ExecContext, Locale};
pub use error::{CompileFailure, FunctionError, FunctionResult, Outcome};
pub use functions::FunctionRegistry;
pub use query::CompiledQuery;
pub use settings::{AnalyzerSettings, CompilerSettings};
