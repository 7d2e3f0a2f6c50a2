//! Shared test harness modules for the Waypost CLI.

use super::*;

mod steps;
