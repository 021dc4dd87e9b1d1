pub mod preview;

pub use self::preview::preview_compact;
