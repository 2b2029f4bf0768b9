/// Plain text listing of the available routes (GET /)
pub async fn index_handler() -> &'static str {
    "Welcome to the Hawaii Climate Analysis API!\n\
     Available Routes:\n\
     /api/v1.0/precipitation\n\
     /api/v1.0/stations\n\
     /api/v1.0/tobs\n\
     /api/v1.0/<start> (enter date as YYYY-MM-DD in place of <start>)\n\
     /api/v1.0/<start>/<end> (enter as YYYY-MM-DD/YYYY-MM-DD in place of <start> and <end>)\n"
}
