// ==================== Constants ====================
const LABEL: &str = "Loading";
const MAX_DOTS: u64 = 3;
// dot count moves once every TICKS_PER_DOT ticks
const TICKS_PER_DOT: u64 = 2;

/// Number of dots shown for a given tick
/// - 0,0,1,1,2,2,3,3 then repeats
pub fn dots(tick: u64) -> usize {
    ((tick / TICKS_PER_DOT) % (MAX_DOTS + 1)) as usize
}

/// `Loading` + dots, right padded with spaces so the label never changes
/// width while it animates
pub fn label(tick: u64) -> String {
    let dots = dots(tick);
    format!(
        "{}{}{}",
        LABEL,
        ".".repeat(dots),
        " ".repeat(MAX_DOTS as usize - dots)
    )
}

/// only even ticks move the dots, odd ticks keep whatever is on screen
pub fn changes_on(tick: u64) -> bool {
    tick % TICKS_PER_DOT == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dot_cycle() {
        let cycle: Vec<usize> = (0..16).map(dots).collect();
        assert_eq!(cycle, vec![0, 0, 1, 1, 2, 2, 3, 3, 0, 0, 1, 1, 2, 2, 3, 3]);
    }

    #[test]
    fn test_label_width_is_constant() {
        assert_eq!(label(0), "Loading   ");
        assert_eq!(label(2), "Loading.  ");
        assert_eq!(label(5), "Loading.. ");
        assert_eq!(label(7), "Loading...");
        for tick in 0..32 {
            assert_eq!(label(tick).len(), LABEL.len() + MAX_DOTS as usize);
        }
    }

    #[test]
    fn test_label_changes_on_even_ticks() {
        assert!(changes_on(0));
        assert!(!changes_on(1));
        assert!(changes_on(2));
        for tick in (1..20).filter(|t| !changes_on(*t)) {
            assert_eq!(label(tick), label(tick - 1));
        }
    }
}
