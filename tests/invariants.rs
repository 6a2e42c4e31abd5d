use grid_2048::engine::{Grid, Move};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

fn nonempty(g: &Grid) -> usize {
    g.tiles().iter().filter(|t| !t.is_empty()).count()
}

fn total(g: &Grid) -> u64 {
    g.tiles().iter().map(|t| t.value()).sum()
}

/// Single-merge reference: drop empties, then merge equal neighbours pairwise
/// from the front, never reusing a merged result.
fn reference_line(line: &[u64]) -> (Vec<u64>, u64) {
    let packed: Vec<u64> = line.iter().copied().filter(|&v| v != 0).collect();
    let mut out = Vec::with_capacity(line.len());
    let mut gained = 0;
    let mut i = 0;
    while i < packed.len() {
        if i + 1 < packed.len() && packed[i] == packed[i + 1] {
            out.push(packed[i] * 2);
            gained += packed[i] * 2;
            i += 2;
        } else {
            out.push(packed[i]);
            i += 1;
        }
    }
    out.resize(line.len(), 0);
    (out, gained)
}

fn line_of(values: &[Vec<u64>], dir: Move, idx: usize) -> Vec<u64> {
    let n = values.len();
    let mut line: Vec<u64> = (0..n)
        .map(|i| if dir.is_vertical() { values[i][idx] } else { values[idx][i] })
        .collect();
    if dir.is_reversed() {
        line.reverse();
    }
    line
}

fn random_grid(rng: &mut StdRng, size: usize) -> Grid {
    let rows: Vec<Vec<u64>> = (0..size)
        .map(|_| (0..size).map(|_| [0, 0, 2, 4, 8, 16][rng.gen_range(0..6)]).collect())
        .collect();
    Grid::from_values(rows, 0).unwrap()
}

#[test]
fn random_play_keeps_invariants() {
    for seed in 0..20u64 {
        let mut rng = StdRng::seed_from_u64(seed);
        let size = 3 + (seed as usize % 3);
        let mut g = Grid::new(size, &mut rng).unwrap();
        let mut steps = 0;
        while !g.is_over() && steps < 400 {
            let dir = *Move::ALL.choose(&mut rng).unwrap();
            let (shifted, shift_changed) = g.shift(dir);
            let (next, changed) = g.get_moved(dir, &mut rng);
            assert_eq!(changed, shift_changed);

            // Power-of-two tiles only.
            for v in next.values().into_iter().flatten() {
                assert!(v == 0 || (v >= 2 && v.is_power_of_two()), "bad tile {v}");
            }
            // Score never drops; tile sum is conserved by the slide itself.
            assert!(next.score() >= g.score());
            assert_eq!(next.score(), shifted.score());
            assert_eq!(total(&shifted), total(&g));

            if changed {
                assert_eq!(nonempty(&next), nonempty(&shifted) + 1);
                let diffs: Vec<(u64, u64)> = shifted
                    .tiles()
                    .iter()
                    .zip(next.tiles())
                    .filter(|(a, b)| a != b)
                    .map(|(a, b)| (a.value(), b.value()))
                    .collect();
                assert_eq!(diffs, vec![(0, 2)]);
            } else {
                assert_eq!(next, g);
            }
            g = next;
            steps += 1;
        }
    }
}

#[test]
fn every_line_matches_single_merge_reference() {
    let mut rng = StdRng::seed_from_u64(2048);
    for _ in 0..300 {
        let size = rng.gen_range(1..=6);
        let g = random_grid(&mut rng, size);
        let before = g.values();
        for dir in Move::ALL {
            let (next, _) = g.shift(dir);
            let after = next.values();
            let mut gained = 0;
            for idx in 0..size {
                let (expected, line_gain) = reference_line(&line_of(&before, dir, idx));
                assert_eq!(line_of(&after, dir, idx), expected, "{dir} line {idx} of {before:?}");
                gained += line_gain;
            }
            assert_eq!(next.score() - g.score(), gained);
        }
    }
}

#[test]
fn branches_do_not_alias() {
    let mut rng = StdRng::seed_from_u64(77);
    let root = random_grid(&mut rng, 4);
    let snapshot = root.clone();
    let branches: Vec<Grid> = Move::ALL.iter().map(|&m| root.get_moved(m, &mut rng).0).collect();
    let mut walker = branches[0].clone();
    for m in Move::ALL.iter().cycle().take(50) {
        walker = walker.get_moved(*m, &mut rng).0;
    }
    assert_eq!(root, snapshot);
    for (m, branch) in Move::ALL.iter().zip(&branches) {
        // Each branch is its own shift plus at most one spawned 2.
        let (shifted, _) = root.shift(*m);
        let diffs = shifted.tiles().iter().zip(branch.tiles()).filter(|(a, b)| a != b).count();
        assert!(diffs <= 1);
        assert_eq!(branch.score(), shifted.score());
    }
}

fn independent_is_over(values: &[Vec<u64>]) -> bool {
    let n = values.len();
    let mut over = true;
    for r in 0..n {
        for c in 0..n {
            if values[r][c] == 0 {
                return false;
            }
            if c + 1 < n && values[r][c] == values[r][c + 1] {
                over = false;
            }
            if r + 1 < n && values[r][c] == values[r + 1][c] {
                over = false;
            }
        }
    }
    over
}

fn check_terminal_sweep(size: usize, alphabet: &[u64]) {
    let cells = size * size;
    let combos = alphabet.len().pow(cells as u32);
    let mut terminal = 0;
    for code in 0..combos {
        let mut rest = code;
        let flat: Vec<u64> = (0..cells)
            .map(|_| {
                let v = alphabet[rest % alphabet.len()];
                rest /= alphabet.len();
                v
            })
            .collect();
        let rows: Vec<Vec<u64>> = flat.chunks(size).map(|c| c.to_vec()).collect();
        let g = Grid::from_values(rows.clone(), 0).unwrap();
        let no_move_changes = Move::ALL.iter().all(|&m| !g.shift(m).1);
        assert_eq!(g.is_over(), independent_is_over(&rows), "{rows:?}");
        assert_eq!(g.is_over(), no_move_changes, "{rows:?}");
        assert_eq!(g.is_over(), g.legal_moves().is_empty(), "{rows:?}");
        terminal += g.is_over() as usize;
    }
    assert!(terminal > 0);
}

#[test]
fn terminal_check_exhaustive_2x2() {
    check_terminal_sweep(2, &[0, 2, 4, 8, 16]);
}

#[test]
fn terminal_check_exhaustive_3x3() {
    check_terminal_sweep(3, &[2, 4, 8]);
}

#[test]
fn terminal_check_single_cell() {
    check_terminal_sweep(1, &[0, 2, 4]);
}

#[test]
fn lookahead_is_read_only_and_matches_merges() {
    let mut rng = StdRng::seed_from_u64(5);
    for _ in 0..200 {
        let g = random_grid(&mut rng, 4);
        let before = g.clone();
        let values = g.values();
        let row_merge = (0..4).any(|i| reference_line(&line_of(&values, Move::Left, i)).1 > 0);
        let col_merge = (0..4).any(|i| reference_line(&line_of(&values, Move::Up, i)).1 > 0);
        assert_eq!(g.equal_in_row(), row_merge);
        assert_eq!(g.equal_in_column(), col_merge);
        assert_eq!(g, before);
    }
}

#[test]
fn documented_examples() {
    let row = |values: [u64; 4]| {
        let mut rows = vec![values.to_vec()];
        rows.extend(std::iter::repeat(vec![0; 4]).take(3));
        Grid::from_values(rows, 0).unwrap()
    };

    let (g, changed) = row([2, 2, 4, 0]).shift(Move::Left);
    assert!(changed);
    assert_eq!(g.values()[0], vec![4, 4, 0, 0]);
    assert_eq!(g.score(), 4);

    let (g, _) = row([2, 2, 2, 0]).shift(Move::Left);
    assert_eq!(g.values()[0], vec![4, 2, 0, 0]);
    assert_eq!(g.score(), 4);

    let (g, changed) = row([2, 4, 8, 16]).shift(Move::Left);
    assert!(!changed);
    assert_eq!(g.values()[0], vec![2, 4, 8, 16]);
    assert_eq!(g.score(), 0);

    let packed = Grid::from_values(
        [[2, 4, 8, 16], [4, 8, 16, 32], [8, 16, 32, 64], [16, 32, 64, 128]],
        0,
    )
    .unwrap();
    assert!(packed.is_over());

    let fresh = Grid::new(4, &mut StdRng::seed_from_u64(1)).unwrap();
    assert_eq!(nonempty(&fresh), 1);
    assert_eq!(fresh.highest_tile(), 2);
    assert_eq!(fresh.score(), 0);
}
