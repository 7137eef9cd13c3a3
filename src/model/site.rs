use super::types::Element;

/// Species-occupancy mapping of one site, sorted by element.
///
/// Occupancies sum to 1 for ordered sites. Equality for dilute-site
/// detection is exact (bit pattern), matching how per-site compositions
/// are counted upstream.
#[derive(Debug, Clone, PartialEq)]
pub struct Occupancy {
    entries: Vec<(Element, f64)>,
}

/// Exact, hashable signature of an [`Occupancy`].
pub type OccupancySignature = Vec<(Element, u64)>;

impl Occupancy {
    /// Single fully-occupied species.
    pub fn ordered(element: Element) -> Self {
        Self {
            entries: vec![(element, 1.0)],
        }
    }

    /// Builds from (element, fraction) pairs; entries are sorted by element
    /// and duplicate elements are merged.
    pub fn new(mut entries: Vec<(Element, f64)>) -> Self {
        entries.sort_by_key(|(el, _)| *el);
        let mut merged: Vec<(Element, f64)> = Vec::with_capacity(entries.len());
        for (el, occ) in entries {
            match merged.last_mut() {
                Some((last, total)) if *last == el => *total += occ,
                _ => merged.push((el, occ)),
            }
        }
        Self { entries: merged }
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (Element, f64)> + '_ {
        self.entries.iter().copied()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Exact signature used for occurrence counting and fingerprinting.
    pub fn signature(&self) -> OccupancySignature {
        self.entries
            .iter()
            .map(|(el, occ)| (*el, occ.to_bits()))
            .collect()
    }
}

/// One atomic site: an occupancy plus a fractional position.
///
/// Site identity is positional (the index within the structure), never
/// reference-based.
#[derive(Debug, Clone, PartialEq)]
pub struct Site {
    pub occupancy: Occupancy,
    pub frac: [f64; 3],
}

impl Site {
    pub fn new(occupancy: Occupancy, frac: [f64; 3]) -> Self {
        Self { occupancy, frac }
    }

    /// Ordered single-species site.
    pub fn ordered(element: Element, frac: [f64; 3]) -> Self {
        Self::new(Occupancy::ordered(element), frac)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordered_occupancy() {
        let occ = Occupancy::ordered(Element::Ni);
        let entries: Vec<_> = occ.iter().collect();
        assert_eq!(entries, vec![(Element::Ni, 1.0)]);
    }

    #[test]
    fn entries_sorted_and_merged() {
        let occ = Occupancy::new(vec![
            (Element::O, 0.25),
            (Element::Li, 0.5),
            (Element::O, 0.25),
        ]);
        let entries: Vec<_> = occ.iter().collect();
        assert_eq!(entries, vec![(Element::Li, 0.5), (Element::O, 0.5)]);
    }

    #[test]
    fn signatures_compare_exactly() {
        let a = Occupancy::new(vec![(Element::Ni, 1.0)]);
        let b = Occupancy::ordered(Element::Ni);
        assert_eq!(a.signature(), b.signature());

        let c = Occupancy::new(vec![(Element::Ni, 0.5), (Element::Cr, 0.5)]);
        assert_ne!(a.signature(), c.signature());
    }
}
