use std::fmt::Display;

use winnow::{
    Parser,
    combinator::trace,
    error::{ContextError, ParserError},
    stream::Stream,
    token::take,
};

/// Every binary parser in this crate reports winnow's [`ContextError`].
pub trait WinnowParser<I, O>: Parser<I, O, ContextError> {}

impl<I, O, P> WinnowParser<I, O> for P where P: Parser<I, O, ContextError> {}

/// Bytes up to the first NUL, lossily decoded
pub fn nul_terminated(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}

/// 8 raw signature bytes
pub fn signature<'a>() -> impl WinnowParser<&'a [u8], &'a [u8]> {
    take(8_usize).trace("signature")
}

/// Fixed-width 8 byte resource reference, not necessarily NUL padded
pub fn resref<'a>() -> impl WinnowParser<&'a [u8], String> {
    take(8_usize).map(nul_terminated).trace("resref")
}

/// Short fixed-width string such as a 2 character animation code
pub fn fixed_str<'a>(len: usize) -> impl WinnowParser<&'a [u8], String> {
    take(len).map(nul_terminated).trace("fixed_str")
}

/// Offset of `rest` within `full`, where `rest` is a suffix of `full`
pub fn position(full: &[u8], rest: &[u8]) -> usize {
    full.len() - rest.len()
}

/// tail .trace()
pub trait TraceHelper<I, O, E> {
    fn trace(self, name: impl Display) -> impl Parser<I, O, E>;
}

impl<P, I, O, E> TraceHelper<I, O, E> for P
where
    I: Stream,
    E: ParserError<I>,
    P: Parser<I, O, E>,
{
    fn trace(self, name: impl Display) -> impl Parser<I, O, E> {
        trace(name, self)
    }
}
