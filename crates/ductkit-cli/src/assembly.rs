//! Reference hotend mount: a back plate on the carriage plate, a fan
//! block around the heat block, a duct under it, and the bought-in parts
//! (vitamins) placed for preview.

use anyhow::{Context, Result};
use clap::ValueEnum;
use ductkit::ductkit_kernel::Solid;
use ductkit::ductkit_math::Vec3;
use ductkit::{
    align, drill, group, mirror, subtract, transform, Config, DebugMode, Geometry, Helpers, Hole,
    Shape, Step,
};
use tracing::debug;

const E_PLATE_WIDTH: f64 = 64.0;
const E_PLATE_HEIGHT: f64 = 47.5;
const E_PLATE_DEPTH: f64 = 2.5;
const MAGNET_HEIGHT: f64 = 3.0;
const CENTER_OFFSET_X: f64 = 5.0;
const PLATE_OFFSET_Y: f64 = 2.0;
const SCREW_RADIUS: f64 = 1.5;
const BLOWER_MARGIN_X: f64 = 2.0;

/// Which parts to emit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Print {
    /// Everything in mounting position, turned upright.
    #[default]
    Preview,
    /// Printable parts only.
    All,
    /// The fan block.
    Block,
    /// The back plate.
    Plate,
    /// The blower duct.
    Duct,
}

/// What to include in the assembly.
#[derive(Debug, Clone)]
pub struct Options {
    pub print: Print,
    pub show_vitamins: bool,
    pub has_blowers: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            print: Print::Preview,
            show_vitamins: true,
            has_blowers: true,
        }
    }
}

/// Primitive factory bound to one run's settings.
struct Parts {
    mode: DebugMode,
    segments: u32,
    tolerance: f64,
}

impl Parts {
    fn new(config: &Config) -> Self {
        Self {
            mode: config.debug_mode(),
            segments: config.segments,
            tolerance: config.tolerance,
        }
    }

    fn cuboid(&self, name: &str, width: f64, height: f64, depth: f64) -> Result<Geometry> {
        let solid = Solid::cuboid(&Vec3::new(width, height, depth))?;
        Ok(Geometry::with_mode(solid, name, self.mode))
    }

    /// Cylinder along Z.
    fn cylinder(&self, name: &str, radius: f64, height: f64) -> Result<Geometry> {
        let solid = Solid::cylinder(radius, height, self.segments)?;
        Ok(Geometry::with_mode(solid, name, self.mode))
    }

    /// Prism along Z over a rounded rectangle, radii clockwise from top left.
    fn round_rect(
        &self,
        name: &str,
        width: f64,
        height: f64,
        depth: f64,
        radii: [f64; 4],
    ) -> Result<Geometry> {
        let solid = Solid::round_rect(width, height, depth, radii, self.segments)?;
        Ok(Geometry::with_mode(solid, name, self.mode))
    }
}

struct Vitamins {
    heatblock: Shape,
    eplate: Shape,
    pogo: Shape,
    blower: Shape,
}

fn vitamins(parts: &Parts) -> Result<Vitamins> {
    let eplate = parts.cuboid("eplate", E_PLATE_WIDTH, E_PLATE_HEIGHT, E_PLATE_DEPTH)?;
    let heatblock = align(parts.cuboid("heatblock", 20.0, 11.5, 16.0)?)
        .top()
        .center_x()
        .back()
        .to(&eplate)
        .bottom()
        .center_x()
        .front()
        .apply()?;
    Ok(Vitamins {
        heatblock,
        eplate: eplate.into(),
        pogo: parts.cuboid("pogo", 12.0, 5.0, 6.0)?.into(),
        blower: parts.cuboid("blower", 15.0, 20.0, 30.0)?.into(),
    })
}

/// The plate that carries the mount on the carriage. Registers
/// `place_pogo` for the connector sitting on its ledge.
fn plate(parts: &Parts, helpers: &mut Helpers) -> Result<Shape> {
    let depth = MAGNET_HEIGHT + parts.tolerance;
    let base = parts.cuboid(
        "plate_base",
        E_PLATE_WIDTH / 2.0 + CENTER_OFFSET_X,
        E_PLATE_HEIGHT,
        depth,
    )?;

    let screw = SCREW_RADIUS + parts.tolerance;
    let holes = [(6.0, -6.5, 11.75), (screw, 12.0, 9.4), (screw, -5.5, -9.5)].map(|(radius, x, y)| {
        Hole::new(x, y, radius)
            .depth(depth + 2.0)
            .segments(parts.segments)
    });
    let drilled = drill(base, &holes)?;

    let ledge = align(parts.cuboid("pogo_ledge", E_PLATE_WIDTH / 2.0 - CENTER_OFFSET_X, 5.0, depth)?)
        .left()
        .top()
        .center_z()
        .to(&drilled)
        .right()
        .top()
        .center_z()
        .apply()?;
    let seat = ledge.bounds()?.context("pogo ledge is empty")?;

    helpers.set("place_pogo", move |shape| {
        align(shape)
            .bottom()
            .center_x()
            .front()
            .to_position()
            .xyz(seat.center().x, seat.top, seat.front)
            .apply()
    });

    Ok(drilled.union([ledge]).renamed("plate").into())
}

/// The fan block around the heat block and its duct. Registers the
/// blower placements on either side.
fn block(
    parts: &Parts,
    heatblock: &Shape,
    pogo: &Shape,
    helpers: &mut Helpers,
) -> Result<(Shape, Vec<Shape>)> {
    let t = parts.tolerance;
    let body = align(parts.cuboid("block_body", 40.0, 35.0, 22.0)?)
        .bottom()
        .center_x()
        .center_z()
        .to(heatblock.clone())
        .bottom()
        .center_x()
        .center_z()
        .then()
        .move_()
        .down(4.0)
        .apply()?;

    let fan_hole = align(parts.cylinder("fan_hole", 14.0, 40.0)?.debug())
        .center_x()
        .center_y()
        .to(body.clone())
        .center_x()
        .center_y()
        .then()
        .move_()
        .up(2.0)
        .apply()?;

    let cavity = align(parts.cuboid("heatblock_cavity", 20.0 + 2.0 * t, 11.5 + 2.0 * t, 16.0 + 2.0 * t)?)
        .center()
        .to(heatblock.clone())
        .center()
        .apply()?;

    let block: Shape = subtract([body, fan_hole, cavity, pogo.clone()])?
        .renamed("block")
        .into();

    let duct = align(parts.round_rect("duct_shell", 30.0, 6.0, 12.0, [0.0, 0.0, 2.0, 2.0])?)
        .top()
        .front()
        .to(block.clone())
        .bottom()
        .front()
        .apply()?;
    let channel = align(parts.cuboid("duct_channel", 26.0, 3.0, 14.0)?)
        .center()
        .to(duct.clone())
        .center()
        .apply()?;
    let duct: Shape = subtract([duct, channel])?.renamed("duct").into();

    let anchor = block.clone();
    helpers.set("place_blower_right", move |shape| {
        align(shape)
            .left()
            .bottom()
            .to(anchor.clone())
            .right()
            .bottom()
            .then()
            .move_()
            .right(BLOWER_MARGIN_X)
            .apply()
    });
    let anchor = block.clone();
    helpers.set("place_blower_left", move |shape| {
        let right = align(shape)
            .left()
            .bottom()
            .to(anchor.clone())
            .right()
            .bottom()
            .then()
            .move_()
            .right(BLOWER_MARGIN_X)
            .apply()?;
        mirror(right).about(anchor.clone()).center_x().apply()
    });

    Ok((block, vec![duct]))
}

/// Build the parts selected by `options`.
pub fn build(config: &Config, options: &Options) -> Result<Vec<Shape>> {
    let parts = Parts::new(config);
    let mut helpers = Helpers::new();
    let Vitamins {
        heatblock,
        eplate,
        pogo,
        blower,
    } = vitamins(&parts)?;

    let back_plate = plate(&parts, &mut helpers)?;
    let pogo = helpers.place("place_pogo", pogo)?;

    let mut placed = align(back_plate)
        .top()
        .left()
        .to(eplate.clone())
        .top()
        .left()
        .then()
        .move_()
        .forward(E_PLATE_DEPTH)
        .up(PLATE_OFFSET_Y)
        .apply_to_target_and([pogo])?
        .into_iter();
    let back_plate = placed.next().context("missing back plate")?;
    let pogo = placed.next().context("missing pogo")?;

    let block_pogo = mirror(pogo.clone()).front().apply()?;
    let (fan_block, others) = block(&parts, &heatblock, &block_pogo, &mut helpers)?;

    let matrix = align(fan_block.clone())
        .back()
        .to(back_plate.clone())
        .front()
        .then()
        .move_()
        .forward(parts.tolerance)
        .matrix()?;
    let mut moved = transform(&matrix, std::iter::once(fan_block).chain(others))?.into_iter();
    let fan_block = moved.next().context("missing fan block")?;
    let others: Vec<Shape> = moved.collect();

    let mut vitamins = Vec::new();
    if options.show_vitamins {
        vitamins.extend([heatblock, eplate, pogo, block_pogo]);
        if options.has_blowers {
            let right = helpers.place("place_blower_right", blower.clone())?;
            let left = helpers.place("place_blower_left", blower)?;
            vitamins.extend(transform(&matrix, [right, left])?);
        }
    }
    debug!(vitamins = vitamins.len(), print = ?options.print, "assembled");

    Ok(match options.print {
        Print::All => [vec![back_plate, fan_block], others].concat(),
        Print::Block => vec![fan_block],
        Print::Plate => vec![back_plate],
        Print::Duct => others,
        Print::Preview => {
            let scene = [vec![back_plate, fan_block], vitamins, others].concat();
            group(scene)
                .then()
                .rotate()
                .x(None)
                .then()
                .align()
                .back()
                .to_self()
                .center_z()
                .apply()?
                .unpack()
        }
    })
}
