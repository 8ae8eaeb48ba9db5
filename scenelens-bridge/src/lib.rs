//! SceneLens bridge - runs inside the inspected application.
//!
//! - `scene`: `SceneGraph` introspection trait and the arena `Scene`
//! - `serialize`: live scene to `ContainerNode` snapshot
//! - `executor`: applies inspector commands and produces echoes
//! - `overlay`: highlight overlays with coalesced redraws
//! - `bridge`: channel lifecycle with explicit start/stop

pub mod bridge;
pub mod config;
pub mod demo;
pub mod executor;
pub mod overlay;
pub mod scene;
pub mod serialize;
pub mod state;

pub use bridge::{BridgeHandle, DebugBridge};
pub use config::BridgeConfig;
pub use executor::CommandExecutor;
pub use scene::{NodeKey, NodeSpec, RawUniform, Scene, SceneGraph, ShaderFilter};
pub use state::{new_state, Shared};
