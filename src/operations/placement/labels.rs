//! Default isocenter label sets, keyed by how many isocenters each group has.
//!
//! Callers with site-specific naming conventions supply their own labels;
//! these are the anatomical defaults for whole-body treatments.

/// Default labels for the rotating-group isocenters, superior to inferior.
///
/// `total` counts the isocenters of both groups; when it exceeds `arc_count`
/// a static legs group takes over below the matchline and the arc labels stop
/// at the pelvis.
#[must_use]
pub fn arc_labels(arc_count: usize, total: usize) -> Vec<String> {
    let mut names: Vec<&str> = vec!["Head"];
    if arc_count > 1 || total > 1 {
        if total > arc_count {
            match arc_count {
                2 => names.push("Pelvis"),
                3 => names.extend(["Chest", "Pelvis"]),
                4 => names.extend(["Chest", "Abdomen", "Pelvis"]),
                _ => names.push("Chest"),
            }
        } else {
            names.push("Chest");
            match arc_count {
                3 => names.push("Pelvis"),
                4 => names.extend(["Pelvis", "Legs"]),
                5 => names.extend(["Pelvis", "Upper Legs", "Lower Legs"]),
                6 => names.extend(["Pelvis", "Upper Legs", "Lower Legs", "Feet"]),
                7 => names.extend(["Abdomen", "Pelvis", "Upper Legs", "Lower Legs", "Feet"]),
                _ => {}
            }
        }
    }
    names.into_iter().map(str::to_owned).collect()
}

/// Default labels for the static-group isocenters.
#[must_use]
pub fn static_labels(arc_count: usize, total: usize) -> Vec<String> {
    let mut names = vec!["Upper Legs".to_owned()];
    if total == arc_count + 2 {
        names.push("Lower Legs".to_owned());
    }
    names
}
