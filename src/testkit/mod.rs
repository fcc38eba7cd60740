//! Testing infrastructure for dtsgen.
//!
//! [`DtsTestEnv`] implements [`GenerationEnv`](crate::env::GenerationEnv)
//! over an in-memory file system, so whole generation runs (precondition,
//! clean, discovery, per-file writes) are tested without temp directories.
//!
//! ```rust,ignore
//! use dtsgen::testkit::DtsTestEnv;
//!
//! #[test]
//! fn test_generation() {
//!     let env = DtsTestEnv::new()
//!         .with_isolated_declarations()
//!         .with_file("./src/index.ts", "export const a = 1");
//!
//!     let report = generate_declarations(&env).unwrap();
//!     assert_eq!(
//!         env.fs().file("./dist/types/index.d.ts").as_deref(),
//!         Some("export declare const a: 1;\n")
//!     );
//! }
//! ```

pub mod mock_env;

pub use mock_env::{DtsTestEnv, MemoryFileSystem};
