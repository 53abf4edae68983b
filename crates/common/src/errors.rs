use std::fmt::Display;

/// Domain errors that carry a stable, client-visible code.
///
/// The code is what ends up in `Errors[].Errors[].Code` of an error envelope,
/// the `Display` output becomes the message.
pub trait HasErrorCode: Display {
    fn code(&self) -> &str;
}
