use super::*;

#[test]
fn surface_ids_are_unique() {
    let a = SurfaceId::next();
    let b = SurfaceId::next();
    assert_ne!(a, b);
    assert!(b.get() > a.get());
}

#[test]
fn insert_orders_children() {
    let (a, b, c) = (SurfaceId::next(), SurfaceId::next(), SurfaceId::next());
    let mut panel = Panel::new(Resolution::new(10, 10));
    panel.insert_child(0, a);
    panel.insert_child(1, b);
    panel.insert_child(0, c);
    assert_eq!(panel.children(), &[c, a, b]);

    // Past the end appends.
    let d = SurfaceId::next();
    panel.insert_child(99, d);
    assert_eq!(panel.children(), &[c, a, b, d]);
}

#[test]
fn reinserting_moves_the_child() {
    let (a, b, c) = (SurfaceId::next(), SurfaceId::next(), SurfaceId::next());
    let mut panel = Panel::without_size();
    for s in [a, b, c] {
        let len = panel.children().len();
        panel.insert_child(len, s);
    }
    panel.insert_child(0, c);
    assert_eq!(panel.children(), &[c, a, b]);
    panel.insert_child(3, c);
    assert_eq!(panel.children(), &[a, b, c]);
}

#[test]
fn layout_size_only_for_children() {
    let a = SurfaceId::next();
    let mut panel = Panel::new(Resolution::new(320, 200));
    assert_eq!(panel.layout_size(a), None);
    panel.insert_child(0, a);
    assert_eq!(panel.layout_size(a), Some(Resolution::new(320, 200)));
    panel.set_size(None);
    assert_eq!(panel.layout_size(a), None);
    assert_eq!(panel.size(), None);
}
