//! In-memory worker roster.
//!
//! Backs the roster port with a fixed vector of workers. Production would
//! swap in a database-backed adapter behind the same trait; the demo roster
//! here mirrors the seed data the service ships with.

use async_trait::async_trait;

use crate::domain::{WorkerId, WorkerRecord};
use crate::ports::{RosterError, WorkerRoster};

/// Roster backed by an in-memory vector.
#[derive(Debug, Clone)]
pub struct InMemoryRoster {
    workers: Vec<WorkerRecord>,
}

impl InMemoryRoster {
    pub fn new(workers: Vec<WorkerRecord>) -> Self {
        Self { workers }
    }

    /// The demo roster the service seeds on startup.
    pub fn demo_roster() -> Self {
        Self::new(vec![
            WorkerRecord {
                id: WorkerId::from("w1"),
                name: "Marcus Thompson".to_string(),
                trade: "Electrician".to_string(),
                specialties: vec![
                    "Residential Wiring".to_string(),
                    "Panel Upgrades".to_string(),
                    "Lighting Installation".to_string(),
                ],
                rating: 4.8,
                review_count: 167,
                distance: 1.2,
                hourly_rate: 85.0,
                availability: vec!["tomorrow".to_string(), "next-week".to_string()],
                certifications: vec![
                    "Master Electrician License".to_string(),
                    "OSHA Certified".to_string(),
                ],
                experience: 12,
                completed_jobs: 340,
            },
            WorkerRecord {
                id: WorkerId::from("w2"),
                name: "Rick Williams".to_string(),
                trade: "Plumber".to_string(),
                specialties: vec![
                    "Pipe Repair".to_string(),
                    "Water Heater Installation".to_string(),
                    "Drain Cleaning".to_string(),
                ],
                rating: 4.7,
                review_count: 203,
                distance: 2.8,
                hourly_rate: 75.0,
                availability: vec!["today".to_string(), "tomorrow".to_string()],
                certifications: vec![
                    "Licensed Plumber".to_string(),
                    "Backflow Prevention".to_string(),
                ],
                experience: 8,
                completed_jobs: 285,
            },
            WorkerRecord {
                id: WorkerId::from("w3"),
                name: "Jake Roberts".to_string(),
                trade: "Auto Mechanic".to_string(),
                specialties: vec![
                    "Engine Repair".to_string(),
                    "Brake Service".to_string(),
                    "Diagnostics".to_string(),
                ],
                rating: 4.8,
                review_count: 157,
                distance: 3.2,
                hourly_rate: 95.0,
                availability: vec!["tomorrow".to_string()],
                certifications: vec![
                    "ASE Certified".to_string(),
                    "Hybrid Vehicle Specialist".to_string(),
                ],
                experience: 15,
                completed_jobs: 420,
            },
            WorkerRecord {
                id: WorkerId::from("w4"),
                name: "Alex Turner".to_string(),
                trade: "Auto Mechanic".to_string(),
                specialties: vec![
                    "Oil Changes".to_string(),
                    "Tire Service".to_string(),
                    "Basic Maintenance".to_string(),
                ],
                rating: 4.6,
                review_count: 89,
                distance: 4.1,
                hourly_rate: 65.0,
                availability: vec!["tomorrow".to_string(), "next-week".to_string()],
                certifications: vec!["Basic Auto Repair".to_string()],
                experience: 5,
                completed_jobs: 150,
            },
            WorkerRecord {
                id: WorkerId::from("w5"),
                name: "Danny Fix".to_string(),
                trade: "Mobile Mechanic".to_string(),
                specialties: vec![
                    "On-site Repair".to_string(),
                    "Emergency Service".to_string(),
                    "Diagnostics".to_string(),
                ],
                rating: 4.7,
                review_count: 134,
                distance: 2.5,
                hourly_rate: 90.0,
                availability: vec!["today".to_string(), "tomorrow".to_string()],
                certifications: vec![
                    "Mobile Service Certified".to_string(),
                    "Emergency Response".to_string(),
                ],
                experience: 10,
                completed_jobs: 275,
            },
        ])
    }
}

#[async_trait]
impl WorkerRoster for InMemoryRoster {
    async fn list_all(&self) -> Result<Vec<WorkerRecord>, RosterError> {
        Ok(self.workers.clone())
    }

    async fn find_by_id(&self, id: &WorkerId) -> Result<Option<WorkerRecord>, RosterError> {
        Ok(self.workers.iter().find(|w| &w.id == id).cloned())
    }
}
