pub mod cascade_resolver;
#[cfg(feature = "opencv")]
pub mod opencv_cascade;
