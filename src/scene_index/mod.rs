pub mod index;

pub use index::SceneTimeIndex;
