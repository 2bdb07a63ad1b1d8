use crate::error::Result;
use crate::format::MarkdownFormat;

use super::MarkdownWriter;

/// A value that knows how to write itself as Markdown.
///
/// Strings are written as escaped body text; sequences, tuples and options
/// write their items in order. Element records, tables and documents
/// implement it too, so any of them can be nested as the content of a
/// span, heading or list item.
pub trait WriteMarkdown {
    fn write_markdown(&self, writer: &mut MarkdownWriter<'_>) -> Result<()>;
}

/// Render `value` into a new string and close the writer.
///
/// ```
/// use markwright_engine::{Bold, MarkdownFormat, render};
///
/// let out = render(&("a ", Bold("b")), &MarkdownFormat::default()).unwrap();
/// assert_eq!(out, "a **b**");
/// ```
pub fn render<T: WriteMarkdown + ?Sized>(value: &T, format: &MarkdownFormat) -> Result<String> {
    let mut writer = MarkdownWriter::new(format.clone());
    value.write_markdown(&mut writer)?;
    writer.close()?;
    Ok(writer.into_buffer().unwrap_or_default())
}

impl WriteMarkdown for str {
    fn write_markdown(&self, writer: &mut MarkdownWriter<'_>) -> Result<()> {
        writer.write_text(self)
    }
}

impl WriteMarkdown for String {
    fn write_markdown(&self, writer: &mut MarkdownWriter<'_>) -> Result<()> {
        writer.write_text(self)
    }
}

impl WriteMarkdown for char {
    fn write_markdown(&self, writer: &mut MarkdownWriter<'_>) -> Result<()> {
        let mut buf = [0u8; 4];
        writer.write_text(self.encode_utf8(&mut buf))
    }
}

// A number alone never forms Markdown syntax: "1." and "-" only open a
// list when followed by a space.
macro_rules! write_number {
    ($($ty:ty),*) => {
        $(
            impl WriteMarkdown for $ty {
                fn write_markdown(&self, writer: &mut MarkdownWriter<'_>) -> Result<()> {
                    writer.write_raw(&self.to_string())
                }
            }
        )*
    };
}

write_number!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);

impl<T: WriteMarkdown + ?Sized> WriteMarkdown for &T {
    fn write_markdown(&self, writer: &mut MarkdownWriter<'_>) -> Result<()> {
        (**self).write_markdown(writer)
    }
}

impl<T: WriteMarkdown + ?Sized> WriteMarkdown for Box<T> {
    fn write_markdown(&self, writer: &mut MarkdownWriter<'_>) -> Result<()> {
        (**self).write_markdown(writer)
    }
}

impl<T: WriteMarkdown> WriteMarkdown for Option<T> {
    fn write_markdown(&self, writer: &mut MarkdownWriter<'_>) -> Result<()> {
        match self {
            Some(value) => value.write_markdown(writer),
            None => Ok(()),
        }
    }
}

impl<T: WriteMarkdown> WriteMarkdown for [T] {
    fn write_markdown(&self, writer: &mut MarkdownWriter<'_>) -> Result<()> {
        self.iter().try_for_each(|item| item.write_markdown(writer))
    }
}

impl<T: WriteMarkdown> WriteMarkdown for Vec<T> {
    fn write_markdown(&self, writer: &mut MarkdownWriter<'_>) -> Result<()> {
        self.as_slice().write_markdown(writer)
    }
}

macro_rules! write_tuple {
    ($($name:ident),+) => {
        impl<$($name: WriteMarkdown),+> WriteMarkdown for ($($name,)+) {
            #[allow(non_snake_case)]
            fn write_markdown(&self, writer: &mut MarkdownWriter<'_>) -> Result<()> {
                let ($($name,)+) = self;
                $($name.write_markdown(writer)?;)+
                Ok(())
            }
        }
    };
}

write_tuple!(A);
write_tuple!(A, B);
write_tuple!(A, B, C);
write_tuple!(A, B, C, D);
write_tuple!(A, B, C, D, E);
write_tuple!(A, B, C, D, E, F);

/// `**content**`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bold<C>(pub C);

/// `*content*`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Italic<C>(pub C);

/// `~~content~~`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Strikethrough<C>(pub C);

impl<C: WriteMarkdown> WriteMarkdown for Bold<C> {
    fn write_markdown(&self, writer: &mut MarkdownWriter<'_>) -> Result<()> {
        writer.write_bold(&self.0)
    }
}

impl<C: WriteMarkdown> WriteMarkdown for Italic<C> {
    fn write_markdown(&self, writer: &mut MarkdownWriter<'_>) -> Result<()> {
        writer.write_italic(&self.0)
    }
}

impl<C: WriteMarkdown> WriteMarkdown for Strikethrough<C> {
    fn write_markdown(&self, writer: &mut MarkdownWriter<'_>) -> Result<()> {
        writer.write_strikethrough(&self.0)
    }
}
