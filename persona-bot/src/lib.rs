//! # persona_bot
//!
//! Persona chatbot on top of the `telegram-bot` framework. **Public API:** see [facade]
//! (`run_bot`, `build_handler_chain`, `run_local_turn`) and [`AgentFactory`].

pub mod agent;
mod assembly;
pub mod cli;
pub mod config;
mod facade;
pub mod handler;
pub mod locks;
pub mod memory;
pub mod persona;
pub mod tools;

pub use agent::{Agent, AgentExecutor, AgentFactory, AgentReply, ChatModel, FunctionCallingExecutor};
pub use config::{MemorySettings, MemoryStoreType, PersonaBotConfig};
pub use facade::*;
pub use handler::AgentHandler;
pub use locks::{ChatLocks, ChatTurnGuard};
pub use memory::{MemoryAccessor, WindowedMemory, MEMORY_WINDOW_SIZE};
pub use persona::{resolve, Persona, PersonaProfile, DEFAULT_PERSONA};
pub use tools::{Tool, ToolError, ToolKind, ToolOutput, ToolRegistry};
