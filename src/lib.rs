//! Interaction controller for a viewer of articulated 2D puppets.
//!
//! Users load puppets onto one shared surface, then drag them, pinch or wheel
//! to scale them, and tap their named hit regions to play animation clips.
//! This crate owns everything between raw pointer events and renderer calls:
//! tracking pointers, classifying gestures, hit-testing in z-order, keeping a
//! single selection on top, and choosing which trigger group a tap plays. The
//! renderer itself is abstracted behind the capability traits in [`scene`],
//! and the host carries out the returned [`controller::Action`]s.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`controller`] | Composition root: [`controller::ViewerController`] and its actions |
//! | [`pointer`] | Pressed pointers and their last positions |
//! | [`gesture`] | Drag / pinch state machine and zoom math |
//! | [`hit`] | Z-ordered hit-testing and tap resolution |
//! | [`selection`] | Single selection and its visual aid |
//! | [`motion`] | Region name to trigger group resolution |
//! | [`scene`] | Capability traits and the puppet arena |
//! | [`loader`] | Async asset loader boundary |
//! | [`puppet`] | Reference box puppet and file loader |
//! | [`geom`] | Points, rectangles and transforms |
//! | [`config`] | Environment-driven viewer configuration |
//! | [`replay`] | Scripted interaction replay |
//! | [`consts`] | Shared numeric constants and name tables |

pub mod config;
pub mod consts;
pub mod controller;
pub mod geom;
pub mod gesture;
pub mod hit;
pub mod loader;
pub mod motion;
pub mod pointer;
pub mod puppet;
pub mod replay;
pub mod scene;
pub mod selection;
