//! Binary space partitioning trees over polygons.
//!
//! Each node keeps the polygons coplanar with its splitting plane; the
//! front and back subtrees hold everything on either side. The boolean
//! operations in [`crate::Solid`] are sequences of `clip_to`, `invert`
//! and `build` on two trees.

use ductkit_math::Plane;

use crate::polygon::{Polygon, Split};

#[derive(Debug, Default)]
pub(crate) struct Node {
    plane: Option<Plane>,
    front: Option<Box<Node>>,
    back: Option<Box<Node>>,
    polygons: Vec<Polygon>,
}

impl Node {
    pub fn new(polygons: Vec<Polygon>) -> Self {
        let mut node = Self::default();
        node.build(polygons);
        node
    }

    /// Swap solid space and empty space.
    pub fn invert(&mut self) {
        for polygon in &mut self.polygons {
            polygon.flip();
        }
        self.plane = self.plane.map(|p| p.flipped());
        if let Some(front) = self.front.as_deref_mut() {
            front.invert();
        }
        if let Some(back) = self.back.as_deref_mut() {
            back.invert();
        }
        std::mem::swap(&mut self.front, &mut self.back);
    }

    /// Remove the parts of `polygons` that lie inside this tree.
    pub fn clip_polygons(&self, polygons: Vec<Polygon>) -> Vec<Polygon> {
        let Some(plane) = &self.plane else {
            return polygons;
        };
        let mut split = Split::default();
        for polygon in &polygons {
            polygon.split(plane, &mut split);
        }
        let mut front = split.front;
        front.append(&mut split.coplanar_front);
        let mut back = split.back;
        back.append(&mut split.coplanar_back);

        let mut kept = match &self.front {
            Some(node) => node.clip_polygons(front),
            None => front,
        };
        if let Some(node) = &self.back {
            kept.extend(node.clip_polygons(back));
        }
        kept
    }

    /// Remove the parts of this tree's polygons that lie inside `other`.
    pub fn clip_to(&mut self, other: &Node) {
        self.polygons = other.clip_polygons(std::mem::take(&mut self.polygons));
        if let Some(front) = self.front.as_deref_mut() {
            front.clip_to(other);
        }
        if let Some(back) = self.back.as_deref_mut() {
            back.clip_to(other);
        }
    }

    pub fn all_polygons(&self) -> Vec<Polygon> {
        let mut out = Vec::new();
        self.collect(&mut out);
        out
    }

    fn collect(&self, out: &mut Vec<Polygon>) {
        out.extend(self.polygons.iter().cloned());
        if let Some(front) = &self.front {
            front.collect(out);
        }
        if let Some(back) = &self.back {
            back.collect(out);
        }
    }

    /// Insert `polygons`, extending the tree where needed.
    pub fn build(&mut self, polygons: Vec<Polygon>) {
        let Some(first) = polygons.first() else {
            return;
        };
        let plane = *self.plane.get_or_insert(*first.plane());
        let mut split = Split::default();
        for polygon in &polygons {
            polygon.split(&plane, &mut split);
        }
        self.polygons.append(&mut split.coplanar_front);
        self.polygons.append(&mut split.coplanar_back);
        if !split.front.is_empty() {
            self.front
                .get_or_insert_with(Box::default)
                .build(split.front);
        }
        if !split.back.is_empty() {
            self.back.get_or_insert_with(Box::default).build(split.back);
        }
    }
}
