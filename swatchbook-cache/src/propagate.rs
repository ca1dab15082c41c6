use swatchbook_schema::{Component, Value, ValueKind};

/// Writes `value` into every style slot of `kind` that references `value.id`.
///
/// Slots of other kinds are never read or written, so a color edit cannot
/// leak into a radius or spacing slot even when ids collide across tables.
/// Returns the number of slots rewritten.
pub fn propagate_value(components: &mut [Component], kind: ValueKind, value: &Value) -> usize {
    let mut touched = 0;
    for component in components.iter_mut() {
        for &slot in kind.slots() {
            let current = component.styles.slot_mut(slot);
            if current.id == value.id {
                *current = value.clone();
                touched += 1;
            }
        }
    }
    touched
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{button, value};
    use swatchbook_schema::StyleSlot;

    #[test]
    fn rewrites_every_matching_color_slot() {
        let mut components = vec![button(1, 7, "Submit"), button(2, 7, "Cancel")];
        let edited = value(1, "Primary", "#ffffff");

        let touched = propagate_value(&mut components, ValueKind::Color, &edited);

        assert_eq!(touched, 6);
        for c in &components {
            assert_eq!(c.styles.background_color.value, "#ffffff");
            assert_eq!(c.styles.text_color.value, "#ffffff");
            assert_eq!(c.styles.border_color.value, "#ffffff");
        }
    }

    #[test]
    fn leaves_other_kinds_alone_when_ids_collide() {
        // Color 1, radius 1 and spacing 1 all share id 1 in their own tables.
        let mut components = vec![button(1, 7, "Submit")];
        let before = components[0].clone();
        let edited = value(1, "Primary", "#ffffff");

        propagate_value(&mut components, ValueKind::Color, &edited);

        let styles = &components[0].styles;
        for slot in [StyleSlot::BorderRadius, StyleSlot::PaddingX, StyleSlot::PaddingY] {
            assert_eq!(styles.slot(slot), before.styles.slot(slot));
        }
    }

    #[test]
    fn ignores_unreferenced_ids() {
        let mut components = vec![button(1, 7, "Submit")];
        let before = components.clone();

        let touched = propagate_value(&mut components, ValueKind::Spacing, &value(42, "xl", "40px"));

        assert_eq!(touched, 0);
        assert_eq!(components, before);
    }
}
