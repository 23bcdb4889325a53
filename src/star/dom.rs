//! STAR document object model.
//!
//! An [`Entry`] owns an insertion-ordered set of uniquely named
//! [`Saveframe`]s; each frame owns ordered scalar tags and ordered
//! [`Loop`]s. These are the only mutable builders in the crate: frames are
//! populated once by the NEF frame builders and then written.

use super::error::Error;
use crate::model::residue::UNUSED;

pub const SF_CATEGORY: &str = "sf_category";
pub const SF_FRAMECODE: &str = "sf_framecode";

/// A named STAR document (`data_<name>`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    name: String,
    frames: Vec<Saveframe>,
}

impl Entry {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            frames: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Adds a frame, replacing in place any existing frame with the same name.
    pub fn add_frame(&mut self, frame: Saveframe) {
        match self.frames.iter_mut().find(|f| f.name == frame.name) {
            Some(existing) => *existing = frame,
            None => self.frames.push(frame),
        }
    }

    pub fn remove_frame(&mut self, name: &str) -> Option<Saveframe> {
        let idx = self.frames.iter().position(|f| f.name == name)?;
        Some(self.frames.remove(idx))
    }

    pub fn frame(&self, name: &str) -> Option<&Saveframe> {
        self.frames.iter().find(|f| f.name == name)
    }

    pub fn frames(&self) -> &[Saveframe] {
        &self.frames
    }

    pub fn frames_in_category<'a>(
        &'a self,
        category: &str,
    ) -> impl Iterator<Item = &'a Saveframe> {
        self.frames.iter().filter(move |f| f.category == category)
    }

    pub fn frame_names(&self) -> Vec<&str> {
        self.frames.iter().map(|f| f.name.as_str()).collect()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

/// A `save_<name>` block with scalar tags and loops.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Saveframe {
    category: String,
    name: String,
    tags: Vec<(String, String)>,
    loops: Vec<Loop>,
}

impl Saveframe {
    /// Creates a frame whose `sf_category` and `sf_framecode` tags mirror
    /// `category` and `name`.
    pub fn new(category: impl Into<String>, name: impl Into<String>) -> Self {
        let category = category.into();
        let name = name.into();
        Self {
            tags: vec![
                (SF_CATEGORY.to_string(), category.clone()),
                (SF_FRAMECODE.to_string(), name.clone()),
            ],
            category,
            name,
            loops: Vec::new(),
        }
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The part of the frame name after `<category>_`, or the whole name.
    pub fn suffix(&self) -> &str {
        self.name
            .strip_prefix(self.category.as_str())
            .and_then(|rest| rest.strip_prefix('_'))
            .unwrap_or(&self.name)
    }

    /// Sets a scalar tag, replacing any previous value.
    ///
    /// `sf_category` and `sf_framecode` are owned by the frame and cannot be
    /// overwritten here.
    pub fn add_tag(&mut self, tag: impl Into<String>, value: impl Into<String>) {
        let tag = tag.into();
        if tag == SF_CATEGORY || tag == SF_FRAMECODE {
            return;
        }
        let value = value.into();
        match self.tags.iter_mut().find(|(t, _)| *t == tag) {
            Some((_, existing)) => *existing = value,
            None => self.tags.push((tag, value)),
        }
    }

    pub fn tag(&self, tag: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|(t, _)| t == tag)
            .map(|(_, v)| v.as_str())
    }

    pub fn tags(&self) -> &[(String, String)] {
        &self.tags
    }

    /// Adds a loop, replacing any existing loop of the same category.
    pub fn add_loop(&mut self, lp: Loop) {
        match self.loops.iter_mut().find(|l| l.category == lp.category) {
            Some(existing) => *existing = lp,
            None => self.loops.push(lp),
        }
    }

    pub fn get_loop(&self, category: &str) -> Option<&Loop> {
        self.loops.iter().find(|l| l.category == category)
    }

    pub fn loops(&self) -> &[Loop] {
        &self.loops
    }
}

/// A `loop_` table: named columns with rows aligned to them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Loop {
    category: String,
    tags: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Loop {
    pub fn new(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            tags: Vec::new(),
            rows: Vec::new(),
        }
    }

    pub fn with_tags<I, S>(category: impl Into<String>, tags: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut lp = Self::new(category);
        for tag in tags {
            lp.add_tag(tag)?;
        }
        Ok(lp)
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn add_tag(&mut self, tag: impl Into<String>) -> Result<(), Error> {
        let tag = tag.into();
        if !self.rows.is_empty() {
            return Err(Error::TagAfterRows {
                category: self.category.clone(),
                tag,
            });
        }
        if self.tags.contains(&tag) {
            return Err(Error::DuplicateTag {
                category: self.category.clone(),
                tag,
            });
        }
        self.tags.push(tag);
        Ok(())
    }

    /// Appends a row; its length must equal the number of tags.
    pub fn add_row<I, S>(&mut self, values: I) -> Result<(), Error>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let row: Vec<String> = values.into_iter().map(Into::into).collect();
        if row.len() != self.tags.len() {
            return Err(Error::RowLength {
                category: self.category.clone(),
                expected: self.tags.len(),
                found: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn column_index(&self, tag: &str) -> Option<usize> {
        self.tags.iter().position(|t| t == tag)
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.column_index(tag).is_some()
    }

    #[inline]
    pub fn nrows(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterates rows as tag-addressable records.
    pub fn records(&self) -> impl Iterator<Item = Record<'_>> {
        self.rows
            .iter()
            .enumerate()
            .map(move |(index, values)| Record {
                lp: self,
                index,
                values,
            })
    }
}

/// A borrowed view of one loop row.
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    lp: &'a Loop,
    index: usize,
    values: &'a [String],
}

impl<'a> Record<'a> {
    /// Zero-based row index within the loop.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn get(&self, tag: &str) -> Option<&'a str> {
        let idx = self.lp.column_index(tag)?;
        Some(self.values[idx].as_str())
    }

    /// Returns the value, or `None` when absent or the unused marker.
    pub fn get_used(&self, tag: &str) -> Option<&'a str> {
        self.get(tag).filter(|v| *v != UNUSED)
    }

    pub fn values(&self) -> &'a [String] {
        self.values
    }

    /// The row's values joined by spaces, for diagnostics.
    pub fn to_line(&self) -> String {
        self.values.join(" ")
    }
}
