/*!
 * # genderize - Gender Presentation Styling for Video-Generation Prompts
 *
 * A Rust library for transforming natural-language video-generation prompts
 * to match a requested gender presentation.
 *
 * ## Features
 *
 * - Harmonize pronouns (they/them/their → he/him/his or she/her/her)
 * - Inject gender-appropriate movement quality cues before the identity anchor
 * - Ensure full-body and head visibility constraints
 * - Preserve the original choreography, scene, and style instructions
 * - Batch processing of prompt template files and whole directories
 * - Overridable transform tables via configuration
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `genderizer`: The core prompt transform (pronoun rules, style tags,
 *   identity anchors, visibility constraints)
 * - `app_config`: Configuration management
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod file_utils;
pub mod genderizer;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::Controller;
pub use errors::{AppError, GenderizeError};
pub use genderizer::{genderize, genderize_batch, Gender, Genderizer, PronounRule, TransformRules};
