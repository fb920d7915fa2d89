//! End-to-end procedure scenarios over the full session harness.
//!
//! Each test assembles a small scene the way a trainer level would: a
//! clippable duct, a stitched tissue bridge, and a three-level procedure
//! (clip, continuous cut, extract). The solver is driven synthetically by
//! feeding contact lists into `Session::fixed_step`.

use nalgebra::{Point3, UnitQuaternion, Vector3};
use surg_core::{SoftBody, SoftParticle, Stitch, StitchGraph, World, CLIP_GROUP};
use surg_interact::{ClipController, CutPolicy, CutVolume, Cutter, GraspController};
use surg_procedure::{Level, Procedure, ProcedureStep, Session};
use surg_types::{
    BodyId, ColliderId, Contact, GraphId, InteractionConfig, InteractionEvent, ParticleRef, Pose,
    ToolId,
};

const GRASPER_JAW: ColliderId = ColliderId::new(1);
const CLIP_APPLIER: ColliderId = ColliderId::new(2);
const GRASPER: ToolId = ToolId::new(1);

/// Duct particle globals start at 0; bridge globals start at 10.
fn build_world() -> (World, BodyId, GraphId) {
    let mut world = World::new();

    let duct = world.add_body(
        SoftBody::new(
            "cystic_duct",
            (0..4)
                .map(|i| SoftParticle::at(i, Point3::new(0.05 * i as f64, 0.0, 0.0)))
                .collect(),
        )
        .with_group(CLIP_GROUP, vec![0, 1])
        .with_attachment_support(),
    );

    let bridge = world.add_body(SoftBody::new(
        "tissue_bridge",
        vec![
            SoftParticle::at(10, Point3::new(0.0, 0.1, 0.0)),
            SoftParticle::at(11, Point3::new(0.1, 0.1, 0.0)),
            SoftParticle::at(12, Point3::new(0.2, 0.1, 0.0)),
            SoftParticle::at(13, Point3::new(0.0, 0.0, 0.0)),
            SoftParticle::at(14, Point3::new(0.1, 0.0, 0.0)),
            SoftParticle::at(15, Point3::new(0.2, 0.0, 0.0)),
        ],
    ));

    let graph = world.add_graph(StitchGraph::new(
        "suture_line",
        (0..3)
            .map(|i| {
                Stitch::new(
                    ParticleRef::new(bridge, i),
                    ParticleRef::new(bridge, i + 3),
                )
            })
            .collect(),
    ));

    world.finish_startup();
    (world, duct, graph)
}

fn build_session() -> (Session, BodyId, GraphId) {
    let (world, duct, graph) = build_world();

    let procedure = Procedure::new(
        vec![
            Level::single(ProcedureStep::clip(
                "clip_duct",
                "Apply a clip to the cystic duct",
                duct,
            )),
            Level::single(ProcedureStep::continuous_cut(
                "sever_suture",
                "Sever the suture line",
                graph,
            )),
            Level::single(ProcedureStep::extract(
                "extract",
                "Extract the specimen",
                duct,
            )),
        ],
        &world,
    )
    .expect("procedure targets exist");

    let session = Session::new(
        world,
        InteractionConfig::default(),
        GraspController::new(GRASPER, GRASPER_JAW),
        ClipController::new(CLIP_APPLIER, &[duct]),
        Cutter::new(
            CutVolume::new(Pose::identity(), Vector3::new(0.15, 0.2, 0.2)),
            CutPolicy::SingleShot,
        ),
        procedure,
    )
    .expect("world is ready");

    (session, duct, graph)
}

fn clip_touch(global: usize) -> Contact {
    Contact::particle(global, CLIP_APPLIER, 0.0, Point3::origin())
}

fn run_clip_level(session: &mut Session) {
    session.set_clip_intent(true);
    session.fixed_step(vec![clip_touch(0)]);
    session.set_clip_intent(false);
}

#[test]
fn clip_step_completes_level_and_spawns_one_instance() {
    let (mut session, duct, _) = build_session();

    session.set_clip_intent(true);
    session.fixed_step(vec![clip_touch(0)]);

    assert_eq!(session.clip().is_clipped(duct), Some(true));
    assert_eq!(session.clip().instances().len(), 1);
    assert_eq!(
        session.drain_notifications(),
        vec![InteractionEvent::LevelAdvanced(1)]
    );

    let checklist = session.checklist();
    assert!(checklist[0].completed);
    assert!(!checklist[1].completed);

    // Holding intent over further steps never spawns a second clip.
    session.fixed_step(vec![clip_touch(0), clip_touch(1)]);
    session.fixed_step(vec![clip_touch(1)]);
    assert_eq!(session.clip().instances().len(), 1);
    assert!(session.drain_notifications().is_empty());
}

#[test]
fn clip_instance_tracks_group_mean_while_level_advances() {
    let (mut session, duct, _) = build_session();
    run_clip_level(&mut session);

    // Spawn pose is the group mean of locals 0 and 1.
    let spawned = session.clip().instances()[0].position();
    assert!((spawned - Point3::new(0.025, 0.0, 0.0)).norm() < 1e-12);

    // The solver deforms the duct; the clip follows even though the clip
    // level is already complete.
    {
        let world = session.world_mut();
        let body = world.body_mut(duct).expect("duct exists");
        body.set_particle_pose(0, Point3::new(0.0, 0.3, 0.0), UnitQuaternion::identity());
        body.set_particle_pose(1, Point3::new(0.05, 0.3, 0.0), UnitQuaternion::identity());
    }
    session.fixed_step(Vec::new());

    let followed = session.clip().instances()[0].position();
    assert!((followed - Point3::new(0.025, 0.3, 0.0)).norm() < 1e-12);
}

#[test]
fn continuous_cut_removes_one_stitch_per_step_and_advances_once() {
    let (mut session, _, graph) = build_session();
    run_clip_level(&mut session);
    session.drain_notifications();

    // Blade over the whole suture line; every stitch qualifies every step.
    session.set_blade_pose(Pose::from_position(Point3::new(0.1, 0.05, 0.0)));
    session.set_cut_intent(true);

    for expected_remaining in [2, 1] {
        session.fixed_step(Vec::new());
        assert_eq!(
            session.world().graph(graph).map(StitchGraph::len),
            Some(expected_remaining)
        );
        // Graph not yet empty: no advancement.
        assert!(session.drain_notifications().is_empty());
    }

    session.fixed_step(Vec::new());
    assert_eq!(session.world().graph(graph).map(StitchGraph::len), Some(0));
    assert_eq!(
        session.drain_notifications(),
        vec![InteractionEvent::LevelAdvanced(2)]
    );

    // Intent stays held on the continuous policy; further steps are no-ops.
    session.fixed_step(Vec::new());
    assert!(session.drain_notifications().is_empty());
}

#[test]
fn grasp_attempt_touching_nothing_cancels_by_end_of_step() {
    let (mut session, duct, _) = build_session();

    session.set_grasp_intent(true);
    session.fixed_step(Vec::new());

    assert!(!session.grasp().intent());
    assert!(!session.grasp().is_holding());
    assert!(session.world().attachment(GRASPER, duct).is_none());
}

#[test]
fn grasp_attaches_and_releases_through_session() {
    let (mut session, duct, _) = build_session();

    session.set_grasp_intent(true);
    session.fixed_step(vec![Contact::particle(
        2,
        GRASPER_JAW,
        0.0,
        Point3::origin(),
    )]);

    assert!(session.grasp().is_holding());
    let attachment = session
        .world()
        .attachment(GRASPER, duct)
        .expect("grasp attached");
    assert_eq!(attachment.particles, vec![2]);

    session.set_grasp_intent(false);
    assert!(session.world().attachment(GRASPER, duct).is_none());
}

#[test]
fn cutter_is_disarmed_outside_cut_steps() {
    let (mut session, _, graph) = build_session();

    // Still on the clip level: cut intent does nothing.
    session.set_blade_pose(Pose::from_position(Point3::new(0.1, 0.05, 0.0)));
    session.set_cut_intent(true);
    session.fixed_step(Vec::new());

    assert_eq!(session.world().graph(graph).map(StitchGraph::len), Some(3));
}

#[test]
fn full_procedure_reaches_finished_exactly_once() {
    let (mut session, _, _) = build_session();

    run_clip_level(&mut session);

    session.set_blade_pose(Pose::from_position(Point3::new(0.1, 0.05, 0.0)));
    session.set_cut_intent(true);
    for _ in 0..3 {
        session.fixed_step(Vec::new());
    }
    session.set_cut_intent(false);
    session.drain_notifications();

    assert!(session.complete_action_step("extract"));
    assert!(session.is_finished());
    assert_eq!(
        session.drain_notifications(),
        vec![InteractionEvent::ProcedureFinished]
    );
    assert!(session.checklist().iter().all(|item| item.completed));

    // Terminal is absorbing: stray events and repeated completions change
    // nothing.
    assert!(!session.complete_action_step("extract"));
    session.fixed_step(Vec::new());
    assert!(session.drain_notifications().is_empty());
}
