//! Rigid-body world backed by Rapier
//!
//! Owns every Rapier set and steps them at a fixed timestep. Vectors cross
//! this boundary as the crate's own math types; Rapier's nalgebra types
//! stay inside this file.

use std::num::NonZeroUsize;

use rapier3d::na::{Isometry3, Quaternion, Translation3, UnitQuaternion};
use rapier3d::prelude::*;

use crate::core::config::PhysicsConfig;
use crate::foundation::math::{Quat, Vec3};

/// Smallest half-extent handed to Rapier; flat meshes still get a box
const MIN_HALF_EXTENT: f32 = 1.0e-3;

/// Box body description
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxBody {
    /// World-space center
    pub position: Vec3,
    /// Initial orientation
    pub rotation: Quat,
    /// Half the box size on each axis
    pub half_extents: Vec3,
    /// Mass; zero makes the body fixed
    pub mass: f32,
}

/// The physics world
pub struct PhysicsWorld {
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    gravity: Vector<Real>,
    parameters: IntegrationParameters,
}

impl PhysicsWorld {
    /// Create an empty world from `config`
    pub fn new(config: &PhysicsConfig) -> Self {
        let [gx, gy, gz] = config.gravity;
        let iterations = NonZeroUsize::new(config.solver_iterations).unwrap_or(NonZeroUsize::MIN);
        
        Self {
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            gravity: vector![gx, gy, gz],
            parameters: IntegrationParameters {
                dt: config.timestep,
                num_solver_iterations: iterations,
                ..IntegrationParameters::default()
            },
        }
    }
    
    /// Current gravity
    pub fn gravity(&self) -> Vec3 {
        Vec3::new(self.gravity.x, self.gravity.y, self.gravity.z)
    }
    
    /// Replace gravity
    pub fn set_gravity(&mut self, gravity: Vec3) {
        self.gravity = vector![gravity.x, gravity.y, gravity.z];
    }
    
    /// Fixed step length in seconds
    pub fn timestep(&self) -> f32 {
        self.parameters.dt
    }
    
    /// Insert a box body with one cuboid collider
    pub fn add_box(&mut self, desc: &BoxBody) -> RigidBodyHandle {
        let q = desc.rotation;
        let pose = Isometry3::from_parts(
            Translation3::new(desc.position.x, desc.position.y, desc.position.z),
            UnitQuaternion::from_quaternion(Quaternion::new(q.w, q.i, q.j, q.k)),
        );
        
        let builder = if desc.mass > 0.0 {
            RigidBodyBuilder::dynamic()
        } else {
            RigidBodyBuilder::fixed()
        };
        let handle = self.bodies.insert(builder.position(pose).build());
        
        let hx = desc.half_extents.x.max(MIN_HALF_EXTENT);
        let hy = desc.half_extents.y.max(MIN_HALF_EXTENT);
        let hz = desc.half_extents.z.max(MIN_HALF_EXTENT);
        let mut collider = ColliderBuilder::cuboid(hx, hy, hz);
        if desc.mass > 0.0 {
            collider = collider.mass(desc.mass);
        }
        self.colliders.insert_with_parent(collider.build(), handle, &mut self.bodies);
        
        handle
    }
    
    /// Remove a body and its colliders; `false` for an unknown handle
    pub fn remove_body(&mut self, handle: RigidBodyHandle) -> bool {
        self.bodies.remove(
            handle,
            &mut self.islands,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        )
        .is_some()
    }
    
    /// Whether `handle` is a live body
    pub fn contains(&self, handle: RigidBodyHandle) -> bool {
        self.bodies.contains(handle)
    }
    
    /// Number of live bodies
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }
    
    /// Mass of a live body (zero for fixed bodies)
    pub fn mass(&self, handle: RigidBodyHandle) -> Option<f32> {
        self.bodies
            .get(handle)
            .map(|body| if body.is_dynamic() { body.mass() } else { 0.0 })
    }
    
    /// Overwrite a body's linear velocity
    pub fn set_linear_velocity(&mut self, handle: RigidBodyHandle, velocity: Vec3) -> bool {
        match self.bodies.get_mut(handle) {
            Some(body) => {
                body.set_linvel(vector![velocity.x, velocity.y, velocity.z], true);
                true
            }
            None => false,
        }
    }
    
    /// Linear velocity of a live body
    pub fn linear_velocity(&self, handle: RigidBodyHandle) -> Option<Vec3> {
        self.bodies.get(handle).map(|body| {
            let v = body.linvel();
            Vec3::new(v.x, v.y, v.z)
        })
    }
    
    /// Current world pose of a live body
    pub fn pose(&self, handle: RigidBodyHandle) -> Option<(Vec3, Quat)> {
        self.bodies.get(handle).map(|body| {
            let t = body.translation();
            let r = body.rotation();
            let rotation = Quat::from_quaternion(nalgebra::Quaternion::new(r.w, r.i, r.j, r.k));
            (Vec3::new(t.x, t.y, t.z), rotation)
        })
    }
    
    /// Advance one fixed timestep
    pub fn step(&mut self) {
        self.pipeline.step(
            &self.gravity,
            &self.parameters,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            None,
            &(),
            &(),
        );
    }
    
    /// Remove every body, keeping gravity and parameters
    pub fn clear(&mut self) {
        let handles: Vec<RigidBodyHandle> = self.bodies.iter().map(|(handle, _)| handle).collect();
        for handle in handles {
            self.remove_body(handle);
        }
    }
}
