// Copyright 2026 HealthBridge Contributors
// Licensed under the Apache License, Version 2.0

pub mod format;
pub mod forms;
pub mod ids;
pub mod mock;
pub mod model;
pub mod session;

pub use forms::*;
pub use ids::*;
pub use model::*;
pub use session::*;
