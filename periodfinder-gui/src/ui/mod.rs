//! # UI Module
//!
//! This module contains the layout of the Period Finder window.

pub mod main_display;
