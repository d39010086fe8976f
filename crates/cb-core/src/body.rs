//! Body-shape assembler: six deformable panels forming a closed box
//!
//! Coordinates are lattice units: x runs along the length (`0..L-1`), y is
//! the height (`0..H-1`) and z the width (`0..W-1`), with the body
//! centerline at `z = (W-1)/2`.

use glam::Vec3;

use crate::constants::WHEEL_TOP_CLEARANCE;
use crate::contour::ContourQuery;
use crate::geometry::{BodyError, BoxSize, Point2, ProfileKind, check_profile};
use crate::mesh::Mesh;
use crate::panel::{DiagonalMode, GridPanel, PanelOptions, Parity, Sides, Winding};
use crate::section::SectionTable;
use crate::wheel::{Wheel, between_inclusive, wheel_at};

/// The six faces of the body's bounding box, in output order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PanelSide {
    /// z = W-1
    Left,
    /// z = 0
    Right,
    /// x = 0
    Front,
    /// x = L-1
    Back,
    /// y = H-1
    Top,
    /// y = 0
    Bottom,
}

impl PanelSide {
    pub const ALL: [PanelSide; 6] = [
        PanelSide::Left,
        PanelSide::Right,
        PanelSide::Front,
        PanelSide::Back,
        PanelSide::Top,
        PanelSide::Bottom,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            PanelSide::Left => "left",
            PanelSide::Right => "right",
            PanelSide::Front => "front",
            PanelSide::Back => "back",
            PanelSide::Top => "top",
            PanelSide::Bottom => "bottom",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Which cross-sections to read back from a deformed body
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SectionRequest {
    /// Length index of a cross-section
    pub front: Option<usize>,
    /// Width index of a height-vs-length cut
    pub side: Option<usize>,
    /// Width index of a width-vs-length cut
    pub top: Option<usize>,
}

impl SectionRequest {
    pub fn is_empty(&self) -> bool {
        self.front.is_none() && self.side.is_none() && self.top.is_none()
    }
}

/// Profile points read back from a deformed body
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SectionPoints {
    pub front: Vec<Point2>,
    pub side: Vec<Point2>,
    pub top: Vec<Point2>,
}

/// Six panels plus the deformation that shapes them into a body
#[derive(Debug, Clone)]
pub struct BodyShape {
    size: BoxSize,
    panels: [GridPanel; 6],
    deformed: Option<[Vec<Vec3>; 6]>,
}

impl BodyShape {
    /// Build the undeformed box with double-sided panels
    pub fn new(size: BoxSize, parity: Parity) -> Result<Self, BodyError> {
        Self::with_sides(size, parity, Sides::Double)
    }

    /// Build the undeformed box
    pub fn with_sides(size: BoxSize, parity: Parity, sides: Sides) -> Result<Self, BodyError> {
        size.validate()?;

        let BoxSize {
            length: lp,
            width: wp,
            height: hp,
        } = size;
        let length = (lp - 1) as f32;
        let width = (wp - 1) as f32;
        let height = (hp - 1) as f32;

        let options = |length, width, mode, winding| PanelOptions {
            length,
            width,
            mode,
            parity,
            winding,
            sides,
        };

        let panels = [
            GridPanel::new(
                options(lp, hp, DiagonalMode::LSymmetrical, Winding::Cw),
                |l, w| Vec3::new(l as f32, w as f32, width),
            ),
            GridPanel::new(
                options(lp, hp, DiagonalMode::LSymmetrical, Winding::Ccw),
                |l, w| Vec3::new(l as f32, w as f32, 0.0),
            ),
            GridPanel::new(
                options(wp, hp, DiagonalMode::LSymmetrical, Winding::Cw),
                |l, w| Vec3::new(0.0, w as f32, l as f32),
            ),
            GridPanel::new(
                options(wp, hp, DiagonalMode::LSymmetrical, Winding::Ccw),
                |l, w| Vec3::new(length, w as f32, l as f32),
            ),
            GridPanel::new(
                options(lp, wp, DiagonalMode::LWSymmetrical, Winding::Ccw),
                |l, w| Vec3::new(l as f32, height, w as f32),
            ),
            GridPanel::new(
                options(lp, wp, DiagonalMode::LWSymmetrical, Winding::Cw),
                |l, w| Vec3::new(l as f32, 0.0, w as f32),
            ),
        ];

        Ok(Self {
            size,
            panels,
            deformed: None,
        })
    }

    pub fn size(&self) -> BoxSize {
        self.size
    }

    pub fn panel(&self, side: PanelSide) -> &GridPanel {
        &self.panels[side.index()]
    }

    /// Final positions of a panel's lattice points
    ///
    /// Before [`apply_contour`](Self::apply_contour) this is the lattice.
    pub fn positions(&self, side: PanelSide) -> &[Vec3] {
        match &self.deformed {
            Some(deformed) => &deformed[side.index()],
            None => self.panel(side).lattice(),
        }
    }

    pub fn is_deformed(&self) -> bool {
        self.deformed.is_some()
    }

    /// Deform every panel from the drawn profiles and wheels
    ///
    /// `side` and `top` hold one sample per length index, `front` one per
    /// width index. `sections` overrides the cross-section from a length
    /// index onward. Deformation always starts from the lattice, so calling
    /// this again replaces the previous result.
    pub fn apply_contour(
        &mut self,
        side: &[Point2],
        front: &[Point2],
        top: &[Point2],
        wheels: &[Wheel],
        sections: &SectionTable,
    ) -> Result<(), BodyError> {
        let BoxSize {
            length: lp,
            width: wp,
            height: hp,
        } = self.size;

        check_profile(ProfileKind::Side, side, lp)?;
        check_profile(ProfileKind::Top, top, lp)?;
        check_profile(ProfileKind::Front, front, wp)?;
        sections.validate(wp)?;

        let degenerate = wheels.iter().filter(|w| w.is_degenerate()).count();
        if degenerate > 0 {
            tracing::warn!(degenerate, "Ignoring wheels without a positive arc radius");
        }
        tracing::debug!(
            length = lp,
            width = wp,
            height = hp,
            wheels = wheels.len(),
            sections = sections.defined_count(),
            "Applying body contour"
        );

        let query = ContourQuery::new(front, sections);
        let contours: Vec<&[Point2]> = (0..lp).map(|l| query.query(l)).collect();

        let profile = Profiles {
            height_points: hp as f32,
            width_points: wp as f32,
            half_width: self.size.half_width(),
            width_max: (wp - 1) as f32,
            side,
            top,
            contours: &contours,
        };

        let deformed = PanelSide::ALL.map(|panel_side| {
            let panel = self.panel(panel_side);
            match panel_side {
                PanelSide::Left => panel.deform(|l, _, p| profile.side_point(l, wp - 1, p, wheels)),
                PanelSide::Right => panel.deform(|l, _, p| profile.side_point(l, 0, p, wheels)),
                PanelSide::Front => panel.deform(|w, _, p| profile.cap_point(0, w, p)),
                PanelSide::Back => panel.deform(|w, _, p| profile.cap_point(lp - 1, w, p)),
                PanelSide::Top => panel.deform(|l, w, p| profile.top_point(l, w, p, wheels)),
                PanelSide::Bottom => panel.deform(|l, w, p| profile.bottom_point(l, w, p, wheels)),
            }
        });

        self.deformed = Some(deformed);
        Ok(())
    }

    /// Meshes of the six panels in [`PanelSide::ALL`] order
    pub fn geometry(&self) -> Vec<Mesh> {
        PanelSide::ALL
            .iter()
            .map(|&side| self.panel(side).mesh(self.positions(side)))
            .collect()
    }

    /// Read cross-sections back from the deformed top panel
    ///
    /// A front request returns the explicit override at that length index
    /// when there is one.
    pub fn section_points(&self, sections: &SectionTable, request: SectionRequest) -> SectionPoints {
        let mut result = SectionPoints::default();
        if request.is_empty() {
            return result;
        }

        let BoxSize {
            length: lp,
            width: wp,
            ..
        } = self.size;
        let top = self.positions(PanelSide::Top);

        if let Some(f) = request.front.filter(|&f| f < lp) {
            result.front = match sections.get(f) {
                Some(section) => section.to_vec(),
                None => (0..wp)
                    .map(|w| Point2::new(w as f32, top[f * wp + w].y))
                    .collect(),
            };
        }

        if let Some(t) = request.top.filter(|&t| t < wp) {
            result.top = (0..lp)
                .map(|l| {
                    let p = top[l * wp + t];
                    Point2::new(p.x, p.z)
                })
                .collect();
        }

        if let Some(s) = request.side.filter(|&s| s < wp) {
            result.side = (0..lp)
                .map(|l| {
                    let p = top[l * wp + s];
                    Point2::new(p.x, p.y)
                })
                .collect();
        }

        result
    }
}

/// Per-build view of the profile data used by every displacement
struct Profiles<'a> {
    height_points: f32,
    width_points: f32,
    half_width: f32,
    width_max: f32,
    side: &'a [Point2],
    top: &'a [Point2],
    contours: &'a [&'a [Point2]],
}

impl Profiles<'_> {
    fn y_scale(&self, l: usize) -> f32 {
        self.side[l].y / self.height_points
    }

    fn z_scale(&self, l: usize) -> f32 {
        self.top[l].y / self.width_points
    }

    fn front_scale(&self, l: usize, w: usize) -> f32 {
        self.contours[l][w].y / self.height_points
    }

    /// Height from the three profiles at lattice length `l`, contour sample `w`
    fn profile_height(&self, l: usize, w: usize, p: Vec3) -> f32 {
        p.y * self.y_scale(l) * self.front_scale(l, w)
    }

    /// Width offset scaled about the centerline
    fn scaled_z(&self, l: usize, p: Vec3) -> f32 {
        (p.z - self.half_width) * self.z_scale(l) + self.half_width
    }

    /// Left/right panels: the wheel arc lifts the whole column above it
    fn side_point(&self, l: usize, contour_w: usize, p: Vec3, wheels: &[Wheel]) -> Vec3 {
        let profile = self.profile_height(l, contour_w, p);
        let y = match wheel_at(wheels, p.x) {
            Some(wheel) => wheel.arc_top(p.x).max(profile),
            None => profile,
        };
        Vec3::new(p.x, y, self.scaled_z(l, p))
    }

    /// Top panel: outside the wheel's lateral band the roof clears the arc
    fn top_point(&self, l: usize, w: usize, p: Vec3, wheels: &[Wheel]) -> Vec3 {
        let profile = self.profile_height(l, w, p);
        let y = match wheel_at(wheels, p.x) {
            Some(wheel) => {
                let on_edge = p.z == 0.0 || p.z == self.width_max;
                let clearance = if on_edge { 0.0 } else { WHEEL_TOP_CLEARANCE };
                let wheel_top = wheel.arc_top(p.x) + clearance;
                // The band is one lattice step narrower on each side
                let inside = between_inclusive(
                    p.z,
                    self.half_width - wheel.offset + 1.0,
                    self.half_width + wheel.offset - 1.0,
                );
                if inside { profile } else { profile.max(wheel_top) }
            }
            None => profile,
        };
        Vec3::new(p.x, y, self.scaled_z(l, p))
    }

    /// Bottom panel: outside the wheel's lateral band the floor follows the arc
    fn bottom_point(&self, l: usize, w: usize, p: Vec3, wheels: &[Wheel]) -> Vec3 {
        let profile = self.profile_height(l, w, p);
        let y = match wheel_at(wheels, p.x) {
            Some(wheel) => {
                let inside = between_inclusive(
                    p.z,
                    self.half_width - wheel.offset,
                    self.half_width + wheel.offset,
                );
                if inside { profile } else { wheel.arc_top(p.x) }
            }
            None => profile,
        };
        Vec3::new(p.x, y, self.scaled_z(l, p))
    }

    /// Front/back caps: fixed length index, contour sampled across the width
    fn cap_point(&self, l: usize, w: usize, p: Vec3) -> Vec3 {
        Vec3::new(p.x, self.profile_height(l, w, p), self.scaled_z(l, p))
    }
}
