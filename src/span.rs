/// A location inside one input line: line number + byte offset range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Span {
    pub line: u32,
    pub start: u32,
    pub end: u32,
}

impl Span {
    pub fn new(line: u32, start: u32, end: u32) -> Self {
        Self { line, start, end }
    }

    pub fn dummy() -> Self {
        Self {
            line: 0,
            start: 0,
            end: 0,
        }
    }

    /// Span covering all of `text` on the given line.
    pub fn whole(line: u32, text: &str) -> Self {
        Self::new(line, 0, text.len() as u32)
    }

    /// Span of `part` within `text`, when `part` is a subslice of it.
    pub fn of_subslice(line: u32, text: &str, part: &str) -> Self {
        let base = text.as_ptr() as usize;
        let ptr = part.as_ptr() as usize;
        if ptr < base || ptr + part.len() > base + text.len() {
            return Self::whole(line, text);
        }
        let start = (ptr - base) as u32;
        Self::new(line, start, start + part.len() as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_of_subslice() {
        let text = "F32_16.txt:1_x_3";
        let (_, numbers) = text.split_once(':').unwrap();
        let bad = numbers.split('_').nth(1).unwrap();
        let span = Span::of_subslice(7, text, bad);
        assert_eq!(span.line, 7);
        assert_eq!(&text[span.start as usize..span.end as usize], "x");
    }

    #[test]
    fn test_of_foreign_slice_falls_back_to_whole() {
        let text = "abc";
        let span = Span::of_subslice(1, text, "zzz");
        assert_eq!(span, Span::new(1, 0, 3));
    }
}
