pub mod layout;
pub mod typeface;
