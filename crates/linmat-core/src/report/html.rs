use maud::{html, Markup};

use crate::error::Result;
use crate::math::Matrix;

impl Matrix {
    /// HTML table of the elements with 0-based row and column headers.
    pub fn to_html(&self) -> Result<String> {
        self.ensure_populated()?;
        let markup: Markup = html! {
            table border="1" {
                caption align="top" { b { "Matrix" } }
                tr align="center" {
                    th { (self.nrows()) "x" (self.ncols()) }
                    @for c in 0..self.ncols() {
                        th { (c) }
                    }
                }
                @for r in 0..self.nrows() {
                    tr align="center" {
                        th { (r) }
                        @for v in self.row_slice(r) {
                            td bgcolor="#ffffdd" { (v) }
                        }
                    }
                }
            }
        };
        Ok(markup.into_string())
    }
}
