// SPDX-FileCopyrightText: © 2026 The lambda_creator contributors
// SPDX-License-Identifier: MIT

#[cfg(feature = "aws_impl")]
pub mod aws_impl;
pub mod common;
pub mod function;
pub mod identity;
pub mod image;
pub mod registry;
pub mod telemetry;
pub mod util;
pub mod validation;
