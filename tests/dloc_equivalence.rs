use proptest::prelude::*;
use rusty_dloc::{
    Axis, AxisInput, ConventionalSelector, DlocError, Frame, LevelSelector as S, MultiIndex,
    NamedSelector, Selected,
};

const AXES: [Axis; 2] = [Axis::Row, Axis::Column];

/// 4x4 frame, values 0..16, two named levels on both axes.
fn test_frame() -> Frame {
    let tuples = vec![
        vec!["A", "A"],
        vec!["A", "B"],
        vec!["A", "C"],
        vec!["B", "A"],
    ];
    let index = MultiIndex::from_named_tuples(tuples.clone(), &["level0", "level1"]).unwrap();
    let columns = MultiIndex::from_named_tuples(tuples, &["level0", "level1"]).unwrap();
    let rows = (0..4)
        .map(|r| (0..4).map(|c| (r * 4 + c) as f64).collect())
        .collect();
    Frame::new(index, columns, rows).unwrap()
}

fn named(pairs: &[(&str, S)]) -> AxisInput {
    AxisInput::Named(pairs.iter().cloned().collect())
}

fn tuple(slots: Vec<S>) -> ConventionalSelector {
    ConventionalSelector::tuple(slots)
}

/// Pairs of dloc vs loc equivalent selectors.
fn accessors_1d_equivalent() -> Vec<(AxisInput, ConventionalSelector)> {
    vec![
        (named(&[("level0", S::label("B"))]), ConventionalSelector::label("B")),
        (named(&[("level0", S::list(["A"]))]), tuple(vec![S::list(["A"])])),
        (
            named(&[("level0", S::between("A", "B"))]),
            tuple(vec![S::between("A", "B")]),
        ),
        (
            named(&[("level1", S::label("A"))]),
            tuple(vec![S::all(), S::label("A")]),
        ),
        (
            named(&[("level1", S::list(["A", "B"]))]),
            tuple(vec![S::all(), S::list(["A", "B"])]),
        ),
        (
            named(&[("level0", S::label("A")), ("level1", S::label("A"))]),
            tuple(vec![S::label("A"), S::label("A")]),
        ),
        (
            AxisInput::Bare(tuple(vec![S::all()])),
            tuple(vec![S::all()]),
        ),
        (
            named(&[("level1", S::between("A", "B"))]),
            tuple(vec![S::all(), S::between("A", "B")]),
        ),
    ]
}

#[test]
fn dloc_axis_access() {
    let frame = test_frame();
    for axis in AXES {
        for (dloc_sel, loc_sel) in accessors_1d_equivalent() {
            let expected = frame.loc().axis(axis).get(&loc_sel).unwrap();
            let actual = frame.dloc().axis(axis).get(dloc_sel.clone()).unwrap();
            assert_eq!(actual, expected, "axis {axis}, selector {dloc_sel:?}");
        }
    }
}

#[test]
fn dloc_tuple_access_no_slice() {
    let frame = test_frame();
    let everything = ConventionalSelector::everything();
    for (dloc_sel, loc_sel) in accessors_1d_equivalent() {
        let expected = frame.loc().get(&loc_sel, &everything).unwrap();
        let actual = frame
            .dloc()
            .get((dloc_sel.clone(), AxisInput::everything()))
            .unwrap();
        assert_eq!(actual, expected, "selector {dloc_sel:?}");
    }
}

#[test]
fn dloc_tuple_access_multiple_axis() {
    let frame = test_frame();
    for (dloc0, loc0) in accessors_1d_equivalent() {
        for (dloc1, loc1) in accessors_1d_equivalent() {
            let expected = frame.loc().get(&loc0, &loc1).unwrap();
            let actual = frame.dloc().get((dloc0.clone(), dloc1.clone())).unwrap();
            assert_eq!(actual, expected, "rows {dloc0:?}, columns {dloc1:?}");
        }
    }
}

#[test]
fn dloc_setitem_axis() {
    for axis in AXES {
        for (dloc_sel, loc_sel) in accessors_1d_equivalent() {
            let (mut dloc_to_set, mut loc_to_set) = (test_frame(), test_frame());
            dloc_to_set
                .dloc_mut()
                .axis(axis)
                .set(dloc_sel.clone(), 99.0)
                .unwrap();
            loc_to_set.loc_mut().axis(axis).set(&loc_sel, 99.0).unwrap();
            assert_eq!(dloc_to_set, loc_to_set, "axis {axis}, selector {dloc_sel:?}");
            assert_ne!(dloc_to_set, test_frame());
        }
    }
}

#[test]
fn dloc_setitem_tuple() {
    let everything = ConventionalSelector::everything();
    for (dloc_sel, loc_sel) in accessors_1d_equivalent() {
        let (mut dloc_to_set, mut loc_to_set) = (test_frame(), test_frame());
        dloc_to_set
            .dloc_mut()
            .set((dloc_sel.clone(), AxisInput::everything()), 99.0)
            .unwrap();
        loc_to_set.loc_mut().set(&loc_sel, &everything, 99.0).unwrap();
        assert_eq!(dloc_to_set, loc_to_set, "selector {dloc_sel:?}");
    }
}

#[test]
fn dloc_setitem_tuple_multiple_axis() {
    for (dloc0, loc0) in accessors_1d_equivalent() {
        for (dloc1, loc1) in accessors_1d_equivalent() {
            let (mut dloc_to_set, mut loc_to_set) = (test_frame(), test_frame());
            dloc_to_set
                .dloc_mut()
                .set((dloc0.clone(), dloc1.clone()), 99.0)
                .unwrap();
            loc_to_set.loc_mut().set(&loc0, &loc1, 99.0).unwrap();
            assert_eq!(dloc_to_set, loc_to_set, "rows {dloc0:?}, columns {dloc1:?}");
        }
    }
}

#[test]
fn outer_level_scalar_drops_the_level() {
    let frame = test_frame();
    let out = frame.dloc().rows(named(&[("level0", S::label("B"))])).unwrap();
    let out = out.as_frame().unwrap();
    assert_eq!(out.shape(), (1, 4));
    assert_eq!(out.index().level_names(), &[Some("level1".to_string())]);
    assert_eq!(out.rows(), vec![vec![12.0, 13.0, 14.0, 15.0]]);
}

#[test]
fn inner_level_on_columns_keeps_both_levels() {
    let frame = test_frame();
    let out = frame
        .dloc()
        .get((AxisInput::everything(), named(&[("level1", S::label("A"))])))
        .unwrap();
    let out = out.as_frame().unwrap();
    assert_eq!(out.shape(), (4, 2));
    assert_eq!(out.columns().depth(), 2);
    assert_eq!(out.rows()[1], vec![4.0, 7.0]);
}

#[test]
fn full_keys_on_both_axes_read_one_cell() {
    let frame = test_frame();
    let key = named(&[("level1", S::label("C")), ("level0", S::label("A"))]);
    assert_eq!(
        frame.dloc().get((key.clone(), key)).unwrap(),
        Selected::Scalar(10.0)
    );
}

#[test]
fn reads_are_idempotent_and_do_not_mutate() {
    let frame = test_frame();
    let sel = named(&[("level1", S::list(["A", "C"]))]);
    let first = frame.dloc().columns(sel.clone()).unwrap();
    let second = frame.dloc().columns(sel).unwrap();
    assert_eq!(first, second);
    assert_eq!(frame, test_frame());
}

#[test]
fn write_round_trip_reads_back_the_value() {
    let mut frame = test_frame();
    let sel = named(&[("level1", S::label("A"))]);
    frame.dloc_mut().set_rows(sel.clone(), 99.0).unwrap();
    let back = frame.dloc().rows(sel).unwrap();
    let back = back.as_frame().unwrap();
    assert_eq!(back.shape(), (2, 4));
    assert!(back.rows().iter().flatten().all(|&v| v == 99.0));
    assert_eq!(frame.get(1, 0), 4.0);
}

#[test]
fn unknown_level_fails_and_leaves_frame_unmodified() {
    let mut frame = test_frame();
    let sel = named(&[("nonexistent_level", S::label("A"))]);
    assert!(matches!(
        frame.dloc().get(sel.clone()),
        Err(DlocError::UnknownLevel { axis: Axis::Row, .. })
    ));
    assert!(matches!(
        frame.dloc_mut().set(sel, 99.0),
        Err(DlocError::UnknownLevel { .. })
    ));
    assert_eq!(frame, test_frame());
}

#[test]
fn conflicting_constraints_fail_before_mutation() {
    let mut frame = test_frame();
    let sel = named(&[("level0", S::label("A")), ("level0", S::label("B"))]);
    let err = frame
        .dloc_mut()
        .axis(Axis::Column)
        .set(sel, 99.0)
        .unwrap_err();
    assert_eq!(
        err,
        DlocError::ConflictingLevelConstraint {
            axis: Axis::Column,
            depth: 0
        }
    );
    assert_eq!(frame, test_frame());
}

#[test]
fn unknown_label_surfaces_loc_error() {
    let frame = test_frame();
    let dloc_err = frame
        .dloc()
        .rows(named(&[("level1", S::label("Z"))]))
        .unwrap_err();
    let loc_err = frame
        .loc()
        .axis(Axis::Row)
        .get(&tuple(vec![S::all(), S::label("Z")]))
        .unwrap_err();
    assert_eq!(dloc_err, loc_err);
}

// ---------------------------------------------------------------------------
// Equivalence law over generated mappings
// ---------------------------------------------------------------------------

fn arb_level_selector() -> impl Strategy<Value = S> {
    let label = prop::sample::select(vec!["A", "B", "C"]);
    prop_oneof![
        label.clone().prop_map(|l| S::label(l)),
        prop::collection::vec(label.clone(), 1..3).prop_map(|ls| S::list(ls)),
        (label.clone(), label).prop_map(|(a, b)| S::between(a, b)),
    ]
}

proptest! {
    #[test]
    fn named_matches_hand_written_tuple(
        level0 in prop::option::of(arb_level_selector()),
        level1 in prop::option::of(arb_level_selector()),
        inner_first in any::<bool>(),
        axis_is_column in any::<bool>(),
    ) {
        let frame = test_frame();
        let axis = if axis_is_column { Axis::Column } else { Axis::Row };

        let mut pairs = Vec::new();
        if let Some(s) = &level0 {
            pairs.push(("level0", s.clone()));
        }
        if let Some(s) = &level1 {
            pairs.push(("level1", s.clone()));
        }
        if inner_first {
            pairs.reverse();
        }
        let mapping: NamedSelector = pairs.into_iter().collect();
        let conventional = tuple(vec![
            level0.unwrap_or(S::Unconstrained),
            level1.unwrap_or(S::Unconstrained),
        ]);

        let via_dloc = frame.dloc().axis(axis).get(mapping.clone());
        let via_loc = frame.loc().axis(axis).get(&conventional);
        prop_assert_eq!(via_dloc, via_loc);

        let (mut a, mut b) = (test_frame(), test_frame());
        let wrote_a = a.dloc_mut().axis(axis).set(mapping, -1.0);
        let wrote_b = b.loc_mut().axis(axis).set(&conventional, -1.0);
        prop_assert_eq!(wrote_a, wrote_b);
        prop_assert_eq!(a, b);
    }
}
