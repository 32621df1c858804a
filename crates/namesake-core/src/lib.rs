//! Core types and engine for namesake.
//!
//! This crate holds everything that does not touch the filesystem:
//!
//! - **Scanner** - group project-relative paths by filename
//! - **Filter engine** - duplicates-only and case-insensitive search
//! - **Pagination** - fixed-size pages over the filtered view
//! - **Rename operation** - move selected members to a new filename
//! - **Session** - the command API front-ends drive
//!
//! File I/O is delegated to an [`AssetHost`] implementation.
//!
//! # Example
//!
//! ```rust
//! use namesake_core::{MemoryHost, ScanConfig, Session};
//!
//! let host = MemoryHost::with_paths([
//!     "Assets/a.png",
//!     "Assets/ui/b.png",
//!     "Assets/icons/b.png",
//! ]);
//! let mut session = Session::new(host, ScanConfig::default());
//! session.scan().unwrap();
//!
//! // Duplicates-only is on by default.
//! assert_eq!(session.view().len(), 1);
//!
//! session.set_selected("b.png", 0, true).unwrap();
//! session.rename_selected_to("b.png", "c").unwrap();
//! assert!(session.groups().contains_key("c.png"));
//! ```

mod config;
mod error;
mod filter;
mod group;
mod host;
mod names;
mod page;
mod progress;
mod record;
mod rename;
mod scanner;
mod session;
mod view;

pub use config::{ScanConfig, ScanConfigBuilder, ScanConfigBuilderError};
pub use error::{HostError, SessionError};
pub use filter::{FilterParams, filter};
pub use group::{AssetGroups, GroupKey};
pub use host::{AssetHost, MemoryHost};
pub use names::{MAX_NAME_LEN, file_name, parent_dir, split_extension, validate_base_name};
pub use page::{PAGE_SIZE, Pager};
pub use progress::ScanProgress;
pub use record::{AssetRecord, Thumbnail};
pub use rename::{RenameOutcome, RenamedAsset, rename_selected};
pub use scanner::AssetScanner;
pub use session::{GroupEntry, GroupSnapshot, MemberSnapshot, Session, SessionSnapshot};
pub use view::{FilteredView, GroupUiState};
