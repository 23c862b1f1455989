/// Something the renderer may draw. Purely cosmetic.
pub trait Visible {
    fn set_visible(&mut self, visible: bool);
    fn is_visible(&self) -> bool;
}

/// Something the physics collaborator may collide against.
pub trait Collidable {
    fn set_collision_enabled(&mut self, enabled: bool);
    fn collision_enabled(&self) -> bool;
}

/// The renderable and collidable shell of a car.
pub trait CarBody: Visible + Collidable {}

impl<T: Visible + Collidable> CarBody for T {}

/// Body for runs without a renderer or physics engine: just the two flags.
#[derive(Clone, Debug, Default)]
pub struct HeadlessBody {
    visible: bool,
    collision_enabled: bool,
}

impl Visible for HeadlessBody {
    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    fn is_visible(&self) -> bool {
        self.visible
    }
}

impl Collidable for HeadlessBody {
    fn set_collision_enabled(&mut self, enabled: bool) {
        self.collision_enabled = enabled;
    }

    fn collision_enabled(&self) -> bool {
        self.collision_enabled
    }
}
