//! Core wire types exchanged with the model provider.

pub mod tool;

pub use tool::{
    FunctionCall, FunctionCallOutcome, FunctionDeclaration, FunctionParameters, PropertySchema,
    Tool,
};
