//! The library code for the `kiwi` static site generator. A run turns a
//! directory of text files into a linked set of HTML pages in three steps:
//!
//! 1. Cataloging the sources ([`crate::catalog`]): every source file becomes a
//!    [`page::Page`] whose title is its first non-blank line. The catalog is
//!    then sorted, and its order drives both the contents page and the
//!    previous/next navigation.
//! 2. Templating ([`crate::template`]): each page's converted content is
//!    inserted into the template at its `@@CONTENTS` line.
//! 3. Resolving tags ([`crate::tags`]): `@@NAME` references are replaced with
//!    values declared anywhere in the template or the page (`@@NAME:"value"`),
//!    or computed by the system tags `@@TITLE`, `@@DATE` and `@@PAGE-NAV`.
//!
//! [`build::build_site`] runs all of it from a [`config::Config`].

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod build;
pub mod catalog;
pub mod config;
pub mod discover;
pub mod markup;
pub mod page;
pub mod tags;
pub mod template;
