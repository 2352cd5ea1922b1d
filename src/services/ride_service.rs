//! Motor del ciclo de vida de los viajes
//!
//! Valida las entradas, cruza los directorios de pasajeros y conductores y
//! decide las reglas de la máquina de estados y de asignación. Las reglas se
//! entregan al repositorio como guards para que se evalúen dentro del mismo
//! ámbito atómico que la escritura. El servicio no guarda estado propio.

use std::sync::Arc;
use tracing::{debug, info};

use crate::context::RequestContext;
use crate::models::{DriverId, EnrichedRide, NewRide, PassengerId, Ride, RideId, RideStatus};
use crate::repositories::{DriverRepository, PassengerRepository, RideRepository};
use crate::utils::errors::{AppError, AppResult};

/// Regla de cambio de estado: un viaje `completed` sólo acepta `completed`
pub fn check_status_change(ride: &Ride, new_status: RideStatus) -> AppResult<()> {
    if ride.status == RideStatus::Completed && new_status != RideStatus::Completed {
        return Err(AppError::CannotChangeCompletedRide);
    }
    Ok(())
}

/// Reglas de asignación, en el orden en que se reportan
pub fn check_assignment(ride: &Ride, driver_id: DriverId, active: Option<&Ride>) -> AppResult<()> {
    match ride.driver_id {
        Some(current) if current == driver_id => return Err(AppError::DriverAlreadyAssignedToRide),
        Some(_) => return Err(AppError::RideAlreadyAssigned),
        None => {}
    }

    if ride.status != RideStatus::Pending {
        return Err(AppError::CannotAssignDriverToNonPendingRide);
    }

    if active.is_some() {
        return Err(AppError::DriverAlreadyOnActiveRide);
    }

    Ok(())
}

pub struct RideService {
    rides: Arc<dyn RideRepository>,
    passengers: Arc<dyn PassengerRepository>,
    drivers: Arc<dyn DriverRepository>,
}

impl RideService {
    pub fn new(
        rides: Arc<dyn RideRepository>,
        passengers: Arc<dyn PassengerRepository>,
        drivers: Arc<dyn DriverRepository>,
    ) -> Self {
        Self {
            rides,
            passengers,
            drivers,
        }
    }

    /// Crear un viaje `pending` para un pasajero existente
    pub async fn create_ride(
        &self,
        ctx: &RequestContext,
        passenger_id: PassengerId,
        origin: &str,
        destination: &str,
    ) -> AppResult<EnrichedRide> {
        if passenger_id == 0 {
            return Err(AppError::PassengerIdRequired);
        }
        if origin.is_empty() {
            return Err(AppError::OriginRequired);
        }
        if destination.is_empty() {
            return Err(AppError::DestinationRequired);
        }

        let passenger = self.passengers.get_by_id(ctx, passenger_id).await?;

        let new_ride = NewRide::new(passenger_id, origin, destination);
        let ride_id = self.rides.create(ctx, new_ride.clone()).await?;
        info!("🚕 Viaje {} creado para el pasajero {}", ride_id, passenger_id);

        Ok(EnrichedRide {
            ride: new_ride.into_ride(ride_id),
            passenger: Some(passenger),
            driver: None,
        })
    }

    /// Obtener un viaje con los snapshots de pasajero y conductor
    pub async fn get_ride(&self, ctx: &RequestContext, ride_id: RideId) -> AppResult<EnrichedRide> {
        if ride_id == 0 {
            return Err(AppError::RideIdRequired);
        }

        let ride = self.rides.get_by_id(ctx, ride_id).await?;
        Ok(self.enrich(ctx, ride).await)
    }

    /// Listar todos los viajes; se corta si el contexto se cancela
    pub async fn list_all_rides(&self, ctx: &RequestContext) -> AppResult<Vec<EnrichedRide>> {
        let rides = self.rides.list_all(ctx).await?;

        let mut enriched = Vec::with_capacity(rides.len());
        for ride in rides {
            ctx.check()?;
            enriched.push(self.enrich(ctx, ride).await);
        }
        Ok(enriched)
    }

    /// Cambiar el estado de un viaje.
    ///
    /// Sólo se bloquea salir de `completed`; el resto de transiciones se
    /// aceptan tal cual.
    pub async fn update_status(&self, ctx: &RequestContext, ride_id: RideId, status: &str) -> AppResult<()> {
        if ride_id == 0 {
            return Err(AppError::RideIdRequired);
        }

        let current = self.rides.get_by_id(ctx, ride_id).await?;
        let parsed = status.parse::<RideStatus>().ok();

        if current.status == RideStatus::Completed && parsed != Some(RideStatus::Completed) {
            return Err(AppError::CannotChangeCompletedRide);
        }
        let new_status = parsed.ok_or(AppError::InvalidRideStatus)?;

        // La regla se vuelve a evaluar bajo el lock del repositorio
        self.rides
            .update_status(ctx, ride_id, new_status, &move |ride: &Ride| {
                check_status_change(ride, new_status)
            })
            .await?;

        info!("🔄 Viaje {} pasa a {}", ride_id, new_status);
        Ok(())
    }

    /// Asignar un conductor a un viaje `pending`, que pasa a `accepted`
    pub async fn assign_driver(&self, ctx: &RequestContext, ride_id: RideId, driver_id: DriverId) -> AppResult<()> {
        if ride_id == 0 {
            return Err(AppError::RideIdRequired);
        }
        if driver_id == 0 {
            return Err(AppError::DriverIdRequired);
        }

        self.rides
            .assign_driver(ctx, ride_id, driver_id, &move |ride: &Ride, active: Option<&Ride>| {
                check_assignment(ride, driver_id, active)
            })
            .await?;

        info!("🚗 Conductor {} asignado al viaje {}", driver_id, ride_id);
        Ok(())
    }

    // Adjunta lo que se pueda; un fallo aquí nunca convierte la lectura en error
    async fn enrich(&self, ctx: &RequestContext, ride: Ride) -> EnrichedRide {
        let passenger = match self.passengers.get_by_id(ctx, ride.passenger_id).await {
            Ok(passenger) => Some(passenger),
            Err(e) => {
                debug!("Viaje {} sin pasajero adjunto: {}", ride.ride_id, e);
                None
            }
        };

        let driver = match ride.driver_id {
            Some(driver_id) => match self.drivers.get_by_id(ctx, driver_id).await {
                Ok(driver) => Some(driver),
                Err(e) => {
                    debug!("Viaje {} sin conductor adjunto: {}", ride.ride_id, e);
                    None
                }
            },
            None => None,
        };

        EnrichedRide {
            ride,
            passenger,
            driver,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewDriver, NewPassenger};
    use crate::repositories::{
        InMemoryDriverRepository, InMemoryPassengerRepository, InMemoryRideRepository,
    };
    use crate::utils::errors::ErrorKind;
    use std::collections::HashMap;

    struct Fixture {
        service: Arc<RideService>,
        rides: Arc<InMemoryRideRepository>,
        passengers: Arc<InMemoryPassengerRepository>,
        drivers: Arc<InMemoryDriverRepository>,
        ctx: RequestContext,
    }

    fn fixture() -> Fixture {
        let rides = Arc::new(InMemoryRideRepository::new());
        let passengers = Arc::new(InMemoryPassengerRepository::new());
        let drivers = Arc::new(InMemoryDriverRepository::new());
        let service = Arc::new(RideService::new(rides.clone(), passengers.clone(), drivers.clone()));
        Fixture {
            service,
            rides,
            passengers,
            drivers,
            ctx: RequestContext::background(),
        }
    }

    impl Fixture {
        async fn passenger(&self, phone_number: i64) -> PassengerId {
            self.passengers
                .register(
                    &self.ctx,
                    NewPassenger {
                        first_name: "Marta".to_string(),
                        last_name: "Ruiz".to_string(),
                        phone_number,
                    },
                )
                .await
                .unwrap()
                .id
        }

        async fn driver(&self, phone_number: i64) -> DriverId {
            self.drivers
                .register(
                    &self.ctx,
                    NewDriver {
                        first_name: "Jorge".to_string(),
                        last_name: "Soto".to_string(),
                        phone_number,
                        car_type: "sedan".to_string(),
                        license_plate: 1234,
                        is_available: true,
                    },
                )
                .await
                .unwrap()
                .id
        }

        async fn status_of(&self, ride_id: RideId) -> RideStatus {
            self.rides.get_by_id(&self.ctx, ride_id).await.unwrap().status
        }
    }

    #[tokio::test]
    async fn test_create_ride_starts_pending_with_fresh_id() {
        let f = fixture();
        let p1 = f.passenger(600000001).await;

        let first = f.service.create_ride(&f.ctx, p1, "A", "B").await.unwrap();
        let second = f.service.create_ride(&f.ctx, p1, "B", "C").await.unwrap();

        assert_eq!(first.ride.ride_id, 1);
        assert_eq!(second.ride.ride_id, 2);
        assert_eq!(first.ride.status, RideStatus::Pending);
        assert_eq!(first.passenger.as_ref().map(|p| p.id), Some(p1));
        assert!(first.driver.is_none());
    }

    #[tokio::test]
    async fn test_create_ride_validation() {
        let f = fixture();
        let p1 = f.passenger(600000001).await;

        assert!(matches!(
            f.service.create_ride(&f.ctx, 0, "A", "B").await,
            Err(AppError::PassengerIdRequired)
        ));
        assert!(matches!(
            f.service.create_ride(&f.ctx, p1, "", "B").await,
            Err(AppError::OriginRequired)
        ));
        assert!(matches!(
            f.service.create_ride(&f.ctx, p1, "A", "").await,
            Err(AppError::DestinationRequired)
        ));
        assert!(matches!(
            f.service.create_ride(&f.ctx, 99, "A", "B").await,
            Err(AppError::PassengerNotFound)
        ));

        // ningún intento fallido consumió un id
        let ride = f.service.create_ride(&f.ctx, p1, "A", "B").await.unwrap();
        assert_eq!(ride.ride.ride_id, 1);
    }

    #[tokio::test]
    async fn test_lifecycle_scenario() {
        let f = fixture();
        let p1 = f.passenger(600000001).await;

        let ride = f.service.create_ride(&f.ctx, p1, "A", "B").await.unwrap();
        assert_eq!(ride.ride.ride_id, 1);
        assert_eq!(ride.ride.status, RideStatus::Pending);

        let d1 = f.driver(611000001).await;
        f.service.assign_driver(&f.ctx, 1, d1).await.unwrap();
        let stored = f.rides.get_by_id(&f.ctx, 1).await.unwrap();
        assert_eq!(stored.status, RideStatus::Accepted);
        assert_eq!(stored.driver_id, Some(d1));

        let again = f.service.assign_driver(&f.ctx, 1, d1).await.unwrap_err();
        assert!(matches!(again, AppError::DriverAlreadyAssignedToRide));
        assert_eq!(again.kind(), ErrorKind::Conflict);

        let d2 = f.driver(611000002).await;
        let other = f.service.assign_driver(&f.ctx, 1, d2).await.unwrap_err();
        assert!(matches!(other, AppError::RideAlreadyAssigned));
        assert_eq!(other.kind(), ErrorKind::Conflict);

        f.service.update_status(&f.ctx, 1, "completed").await.unwrap();
        let err = f.service.update_status(&f.ctx, 1, "cancelled").await.unwrap_err();
        assert!(matches!(err, AppError::CannotChangeCompletedRide));
        assert_eq!(err.kind(), ErrorKind::Precondition);
        assert_eq!(f.status_of(1).await, RideStatus::Completed);
    }

    #[tokio::test]
    async fn test_completed_is_idempotent() {
        let f = fixture();
        let p1 = f.passenger(600000001).await;
        let id = f.service.create_ride(&f.ctx, p1, "A", "B").await.unwrap().ride.ride_id;

        f.service.update_status(&f.ctx, id, "completed").await.unwrap();
        f.service.update_status(&f.ctx, id, "completed").await.unwrap();
        assert_eq!(f.status_of(id).await, RideStatus::Completed);
    }

    #[tokio::test]
    async fn test_completed_guard_wins_over_invalid_status() {
        let f = fixture();
        let p1 = f.passenger(600000001).await;
        let id = f.service.create_ride(&f.ctx, p1, "A", "B").await.unwrap().ride.ride_id;

        assert!(matches!(
            f.service.update_status(&f.ctx, id, "flying").await,
            Err(AppError::InvalidRideStatus)
        ));

        f.service.update_status(&f.ctx, id, "completed").await.unwrap();
        assert!(matches!(
            f.service.update_status(&f.ctx, id, "flying").await,
            Err(AppError::CannotChangeCompletedRide)
        ));
    }

    #[tokio::test]
    async fn test_update_status_validation_and_not_found() {
        let f = fixture();
        assert!(matches!(
            f.service.update_status(&f.ctx, 0, "completed").await,
            Err(AppError::RideIdRequired)
        ));
        assert!(matches!(
            f.service.update_status(&f.ctx, 42, "completed").await,
            Err(AppError::RideNotFound)
        ));
    }

    #[tokio::test]
    async fn test_loose_transitions_are_preserved() {
        let f = fixture();
        let p1 = f.passenger(600000001).await;
        let id = f.service.create_ride(&f.ctx, p1, "A", "B").await.unwrap().ride.ride_id;

        f.service.update_status(&f.ctx, id, "cancelled").await.unwrap();
        f.service.update_status(&f.ctx, id, "accepted").await.unwrap();
        assert_eq!(f.status_of(id).await, RideStatus::Accepted);

        f.service.update_status(&f.ctx, id, "pending").await.unwrap();
        assert_eq!(f.status_of(id).await, RideStatus::Pending);
    }

    #[tokio::test]
    async fn test_assign_driver_validation() {
        let f = fixture();
        assert!(matches!(
            f.service.assign_driver(&f.ctx, 0, 1).await,
            Err(AppError::RideIdRequired)
        ));
        assert!(matches!(
            f.service.assign_driver(&f.ctx, 1, 0).await,
            Err(AppError::DriverIdRequired)
        ));
        assert!(matches!(
            f.service.assign_driver(&f.ctx, 1, 1).await,
            Err(AppError::RideNotFound)
        ));
    }

    #[tokio::test]
    async fn test_assign_driver_to_non_pending_ride() {
        let f = fixture();
        let p1 = f.passenger(600000001).await;
        let d1 = f.driver(611000001).await;
        let id = f.service.create_ride(&f.ctx, p1, "A", "B").await.unwrap().ride.ride_id;

        f.service.update_status(&f.ctx, id, "cancelled").await.unwrap();
        let err = f.service.assign_driver(&f.ctx, id, d1).await.unwrap_err();
        assert!(matches!(err, AppError::CannotAssignDriverToNonPendingRide));
        assert_eq!(err.kind(), ErrorKind::Precondition);
    }

    #[tokio::test]
    async fn test_driver_already_on_active_ride() {
        let f = fixture();
        let p1 = f.passenger(600000001).await;
        let p2 = f.passenger(600000002).await;
        let d1 = f.driver(611000001).await;

        let r1 = f.service.create_ride(&f.ctx, p1, "A", "B").await.unwrap().ride.ride_id;
        f.service.assign_driver(&f.ctx, r1, d1).await.unwrap();

        let r2 = f.service.create_ride(&f.ctx, p2, "C", "D").await.unwrap().ride.ride_id;
        let err = f.service.assign_driver(&f.ctx, r2, d1).await.unwrap_err();
        assert!(matches!(err, AppError::DriverAlreadyOnActiveRide));
        assert_eq!(f.status_of(r2).await, RideStatus::Pending);

        // una vez terminado el primero, el conductor queda libre
        f.service.update_status(&f.ctx, r1, "completed").await.unwrap();
        f.service.assign_driver(&f.ctx, r2, d1).await.unwrap();
        assert_eq!(f.status_of(r2).await, RideStatus::Accepted);
    }

    #[tokio::test]
    async fn test_get_ride_enrichment_is_best_effort() {
        let f = fixture();
        let p1 = f.passenger(600000001).await;
        let d1 = f.driver(611000001).await;
        let id = f.service.create_ride(&f.ctx, p1, "A", "B").await.unwrap().ride.ride_id;
        f.service.assign_driver(&f.ctx, id, d1).await.unwrap();

        let full = f.service.get_ride(&f.ctx, id).await.unwrap();
        assert_eq!(full.passenger.map(|p| p.id), Some(p1));
        assert_eq!(full.driver.map(|d| d.id), Some(d1));

        f.passengers.delete(&f.ctx, p1).await.unwrap();
        f.drivers.delete(&f.ctx, d1).await.unwrap();

        let bare = f.service.get_ride(&f.ctx, id).await.unwrap();
        assert!(bare.passenger.is_none());
        assert!(bare.driver.is_none());
        assert_eq!(bare.ride.driver_id, Some(d1));
    }

    #[tokio::test]
    async fn test_get_ride_errors() {
        let f = fixture();
        assert!(matches!(f.service.get_ride(&f.ctx, 0).await, Err(AppError::RideIdRequired)));
        assert!(matches!(f.service.get_ride(&f.ctx, 5).await, Err(AppError::RideNotFound)));
    }

    #[tokio::test]
    async fn test_list_all_rides_enriches_each_ride() {
        let f = fixture();
        let p1 = f.passenger(600000001).await;
        let p2 = f.passenger(600000002).await;
        let d1 = f.driver(611000001).await;

        let r1 = f.service.create_ride(&f.ctx, p1, "A", "B").await.unwrap().ride.ride_id;
        f.service.create_ride(&f.ctx, p2, "C", "D").await.unwrap();
        f.service.assign_driver(&f.ctx, r1, d1).await.unwrap();

        let rides: HashMap<_, _> = f
            .service
            .list_all_rides(&f.ctx)
            .await
            .unwrap()
            .into_iter()
            .map(|r| (r.ride.ride_id, r))
            .collect();

        assert_eq!(rides.len(), 2);
        assert_eq!(rides[&1].driver.as_ref().map(|d| d.id), Some(d1));
        assert_eq!(rides[&2].passenger.as_ref().map(|p| p.id), Some(p2));
        assert!(rides[&2].driver.is_none());
    }

    #[tokio::test]
    async fn test_cancelled_context_is_distinct_from_not_found() {
        let f = fixture();
        let p1 = f.passenger(600000001).await;
        f.service.create_ride(&f.ctx, p1, "A", "B").await.unwrap();

        let (ctx, handle) = RequestContext::with_cancel();
        handle.cancel();

        let err = f.service.list_all_rides(&ctx).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Cancelled);
        assert!(matches!(f.service.get_ride(&ctx, 1).await, Err(AppError::Cancelled)));
        assert!(matches!(f.service.assign_driver(&ctx, 1, 1).await, Err(AppError::Cancelled)));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_identical_assignments_succeed_once() {
        for _ in 0..20 {
            let f = fixture();
            let p1 = f.passenger(600000001).await;
            let d1 = f.driver(611000001).await;
            let id = f.service.create_ride(&f.ctx, p1, "A", "B").await.unwrap().ride.ride_id;

            let a = {
                let service = Arc::clone(&f.service);
                tokio::spawn(async move {
                    service.assign_driver(&RequestContext::background(), id, d1).await
                })
            };
            let b = {
                let service = Arc::clone(&f.service);
                tokio::spawn(async move {
                    service.assign_driver(&RequestContext::background(), id, d1).await
                })
            };

            let results = [a.await.unwrap(), b.await.unwrap()];
            let successes = results.iter().filter(|r| r.is_ok()).count();
            assert_eq!(successes, 1);

            let failure = results.into_iter().find_map(Result::err).unwrap();
            assert_eq!(failure.kind(), ErrorKind::Conflict);
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_driver_never_holds_two_active_rides() {
        let f = fixture();
        let mut ride_ids = Vec::new();
        for i in 0..8 {
            let p = f.passenger(600000100 + i).await;
            ride_ids.push(f.service.create_ride(&f.ctx, p, "A", "B").await.unwrap().ride.ride_id);
        }
        let drivers = [f.driver(611000001).await, f.driver(611000002).await];

        let mut handles = Vec::new();
        for ride_id in &ride_ids {
            for driver_id in drivers {
                let service = Arc::clone(&f.service);
                let ride_id = *ride_id;
                handles.push(tokio::spawn(async move {
                    service
                        .assign_driver(&RequestContext::background(), ride_id, driver_id)
                        .await
                }));
            }
        }
        futures::future::join_all(handles).await;

        let rides = f.rides.list_all(&f.ctx).await.unwrap();
        for driver_id in drivers {
            let active = rides.iter().filter(|r| r.is_active_for(driver_id)).count();
            assert_eq!(active, 1);
        }
    }

    #[test]
    fn test_assignment_rule_order() {
        let mut ride = NewRide::new(1, "A", "B").into_ride(1);
        let other = NewRide::new(2, "C", "D").into_ride(2);

        assert!(check_assignment(&ride, 3, None).is_ok());
        assert!(matches!(
            check_assignment(&ride, 3, Some(&other)),
            Err(AppError::DriverAlreadyOnActiveRide)
        ));

        ride.status = RideStatus::Cancelled;
        assert!(matches!(
            check_assignment(&ride, 3, Some(&other)),
            Err(AppError::CannotAssignDriverToNonPendingRide)
        ));

        ride.driver_id = Some(3);
        assert!(matches!(
            check_assignment(&ride, 3, None),
            Err(AppError::DriverAlreadyAssignedToRide)
        ));
        assert!(matches!(
            check_assignment(&ride, 4, None),
            Err(AppError::RideAlreadyAssigned)
        ));
    }

    #[test]
    fn test_status_rule() {
        let mut ride = NewRide::new(1, "A", "B").into_ride(1);
        assert!(check_status_change(&ride, RideStatus::Cancelled).is_ok());

        ride.status = RideStatus::Completed;
        assert!(check_status_change(&ride, RideStatus::Completed).is_ok());
        assert!(matches!(
            check_status_change(&ride, RideStatus::Pending),
            Err(AppError::CannotChangeCompletedRide)
        ));
    }
}
