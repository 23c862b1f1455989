pub mod body;
pub mod car;
pub mod checkpoint;
pub mod geometry;
pub mod movement;
pub mod race;
pub mod sensor;
pub mod track;
