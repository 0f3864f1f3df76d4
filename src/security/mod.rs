// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/watchpost

//! Security module - manual SOS override and citizen security code

mod manual_sos;
mod csc;

pub use manual_sos::*;
pub use csc::*;
