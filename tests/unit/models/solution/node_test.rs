use super::*;
use crate::evaluation::CvrpLabel;
use crate::helpers::models::{create_cvrp_evaluation, create_cvrp_instance};

#[test]
fn can_create_node_with_initial_labels() {
    let instance = create_cvrp_instance(&[0, 3], &[&[0, 5], &[5, 0]], 1);
    let evaluation = create_cvrp_evaluation(10);

    let node = create_node_for(evaluation.as_ref(), &instance, 1);

    assert_eq!(node.vertex_id(), 1);
    assert_eq!(*node.forward_label().get::<CvrpLabel>(), CvrpLabel { distance: 0, load: 3 });
    assert_eq!(*node.backward_label().get::<CvrpLabel>(), CvrpLabel { distance: 0, load: 3 });
    assert_eq!(node.cost(evaluation.as_ref()), 0.);
    assert!(node.feasible(evaluation.as_ref()));
}

#[test]
fn can_reset_labels() {
    let instance = create_cvrp_instance(&[0, 3], &[&[0, 5], &[5, 0]], 1);
    let evaluation = create_cvrp_evaluation(10);
    let depot_node = create_node_for(evaluation.as_ref(), &instance, 0);
    let mut node = create_node_for(evaluation.as_ref(), &instance, 1);

    node.update_forward(evaluation.as_ref(), &depot_node, instance.edge(0, 1));
    assert_eq!(node.forward_label().get::<CvrpLabel>().distance, 5);

    node.reset_labels(evaluation.as_ref());
    assert_eq!(node.forward_label().get::<CvrpLabel>().distance, 0);
}
