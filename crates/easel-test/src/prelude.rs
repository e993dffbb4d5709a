//! Prelude module - commonly used test utilities.
//!
//! Use `use easel_test::prelude::*;` to import all essential helpers.

// Fixtures
pub use crate::{
    WORKSPACE_HEIGHT, WORKSPACE_WIDTH, guide_object, rect_object, sample_document,
    sample_document_json, text_object, workspace_bounds,
};

// Harness
pub use crate::{init_test_logging, test_dir, write_document};

// Collaborators
pub use crate::{EchoPluginFactory, FailingPluginFactory, FailureMode, MockSurface, RecordingHook, SurfaceCall};
