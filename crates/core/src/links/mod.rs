//! Stream link projection - the on-disk, player-browsable view of a torrent.
//!
//! For every torrent with cached titles, the projector maintains one
//! directory under a configurable root, holding one small link file per
//! media file (its content is a stream URL the host server understands) and
//! a `.hash` marker identifying the owning torrent. The directory is a
//! derived artifact: it is deleted and rebuilt whole on every projection and
//! can always be regenerated from the title cache and the file listing.

mod projector;
mod sanitize;
mod url;

pub use projector::{LinkProjector, ProjectError, MARKER_FILE};
pub use sanitize::sanitize_name;
pub use url::{build_stream_url, resolve_stream_host, stream_base_url};
