//! GNSS survey toolkit.
//!
//! Two independent pieces of survey-office arithmetic plus the shell around
//! them:
//!
//! - [`gpstime`] and [`products`]: calendar date → GPS week/day → download
//!   URLs for precise, rapid and GFZ-rapid orbit files.
//! - [`ranking`] and [`coords`]: nearest reference stations to a point, by
//!   WGS84 geodesic distance.
//!
//! [`download`], [`stations`], [`render`], [`config`] and [`logging`] are
//! the I/O collaborators used by the `gnss-survey` binary.

pub mod config;
pub mod coords;
pub mod download;
pub mod gpstime;
pub mod logging;
pub mod model;
pub mod products;
pub mod ranking;
pub mod render;
pub mod stations;
