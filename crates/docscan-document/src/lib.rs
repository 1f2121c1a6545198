// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// docscan-document — Photo files and perspective cropping for the scanner.
//
// Used by the desktop bridge, where no native crop module exists. Mobile
// builds hand photos to the platform's own cropper instead.

pub mod crop;
pub mod photo;

pub use crop::QuadCropper;
pub use photo::PhotoStore;
