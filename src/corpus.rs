use serde::Serialize;
use std::fmt;
use std::path::Path;

use crate::error::Result;

const BOOK_SEPARATOR: &str = "\n\n\n\n\n";
const SECTION_SEPARATOR: &str = "\n\n";

/// Location of a verse: book name, chapter label and 1-based verse number
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerseRef {
    pub book: String,
    pub chapter: String,
    pub verse: usize,
}

impl fmt::Display for VerseRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}:{}", self.book, self.chapter, self.verse)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verse {
    pub reference: VerseRef,
    pub text: String,
}

#[derive(Debug)]
struct Chapter {
    label: String,
    // (verse number, text); blank lines keep their number but are not stored
    verses: Vec<(usize, String)>,
}

#[derive(Debug)]
struct Book {
    name: String,
    chapters: Vec<Chapter>,
}

/// Read-only verse collection, flattened in book → chapter → verse order
#[derive(Debug, Default)]
pub struct Corpus {
    books: Vec<String>,
    verses: Vec<Verse>,
}

impl Corpus {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        tracing::info!("Reading corpus from {}", path.display());
        let text = std::fs::read_to_string(path)?;
        Ok(Self::parse(&text))
    }

    pub fn parse(text: &str) -> Self {
        let mut books: Vec<Book> = Vec::new();

        for chunk in text.split(BOOK_SEPARATOR) {
            if chunk.trim().is_empty() {
                continue;
            }

            let mut sections = chunk.split(SECTION_SEPARATOR);
            let name = sections.next().unwrap_or_default().trim().to_string();

            let mut chapters: Vec<Chapter> = Vec::new();
            for section in sections {
                let mut lines = section.split('\n');
                let label = lines.next().unwrap_or_default().trim().to_string();
                let verses = lines
                    .map(|line| line.trim_end_matches('\r'))
                    .enumerate()
                    .filter(|(_, line)| !line.trim().is_empty())
                    .map(|(i, line)| (i + 1, line.to_string()))
                    .collect();

                let chapter = Chapter { label, verses };
                // A repeated label replaces the earlier chapter in place
                match chapters.iter_mut().find(|c| c.label == chapter.label) {
                    Some(existing) => *existing = chapter,
                    None => chapters.push(chapter),
                }
            }

            let book = Book { name, chapters };
            match books.iter_mut().find(|b| b.name == book.name) {
                Some(existing) => *existing = book,
                None => books.push(book),
            }
        }

        let mut verses = Vec::new();
        for book in &books {
            for chapter in &book.chapters {
                for (number, text) in &chapter.verses {
                    verses.push(Verse {
                        reference: VerseRef {
                            book: book.name.clone(),
                            chapter: chapter.label.clone(),
                            verse: *number,
                        },
                        text: text.clone(),
                    });
                }
            }
        }

        Self {
            books: books.into_iter().map(|b| b.name).collect(),
            verses,
        }
    }

    pub fn verses(&self) -> &[Verse] {
        &self.verses
    }

    pub fn books(&self) -> &[String] {
        &self.books
    }

    pub fn len(&self) -> usize {
        self.verses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.verses.is_empty()
    }
}
